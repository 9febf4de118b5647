/// Error taxonomy for the tiling pipeline.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TilerError>;

/// Every variant aborts the run; nothing is retried.
#[derive(Error, Debug)]
pub enum TilerError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("input file must be LAS or LAZ format, got: {extension:?} ({})", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to uncompress {} to LAS: {source}", .path.display())]
    Decompression {
        path: PathBuf,
        #[source]
        source: las::Error,
    },

    #[error("{0} not found next to the current executable or in PATH")]
    ConverterNotFound(String),

    #[error("failed to start converter {}: {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "tiles conversion failed with {}; see {}\n{tail}",
        .code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}")),
        .log_path.display()
    )]
    Conversion {
        code: Option<i32>,
        log_path: PathBuf,
        tail: String,
    },

    #[error("tiles conversion did not produce {}", .0.display())]
    OutputNotFound(PathBuf),

    #[error(
        "refusing to overwrite {}: it contains the input {}",
        .output_dir.display(),
        .input.display()
    )]
    InputInsideOutput { input: PathBuf, output_dir: PathBuf },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl TilerError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_reports_exit_code_and_log() {
        let err = TilerError::Conversion {
            code: Some(2),
            log_path: PathBuf::from("out/tiles_log.txt"),
            tail: "Traceback".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("exit code 2"));
        assert!(message.contains("out/tiles_log.txt"));
        assert!(message.ends_with("Traceback"));
    }

    #[test]
    fn conversion_error_without_code() {
        let err = TilerError::Conversion {
            code: None,
            log_path: PathBuf::from("tiles_log.txt"),
            tail: String::new(),
        };
        assert!(err.to_string().contains("no exit code"));
    }

    #[test]
    fn input_inside_output_names_both_paths() {
        let err = TilerError::InputInsideOutput {
            input: PathBuf::from("out/cloud.las"),
            output_dir: PathBuf::from("out"),
        };
        assert_eq!(
            err.to_string(),
            "refusing to overwrite out: it contains the input out/cloud.las"
        );
    }
}
