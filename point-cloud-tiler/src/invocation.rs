/// External converter resolution and execution.
use crate::crs::CrsProbeResult;
use crate::error::{Result, TilerError};
use crate::request::ConversionRequest;
use constants::converter::{
    CONVERT_SUBCOMMAND, CONVERTER_EXECUTABLE, FLAG_ALWAYS_XY, FLAG_EXTRA_FIELDS, FLAG_OUT,
    FLAG_SRS_OUT, LOG_TAIL_LINES,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Fully resolved converter command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterInvocation {
    pub executable: PathBuf,
    pub args: Vec<OsString>,
}

impl ConverterInvocation {
    /// Builds the argument list for one conversion.
    ///
    /// The CRS flags are only added when the source declares a CRS and a
    /// target code was requested; otherwise coordinates are kept as they are.
    pub fn new(
        executable: PathBuf,
        request: &ConversionRequest,
        working_input: &Path,
        crs: &CrsProbeResult,
    ) -> Self {
        let mut args: Vec<OsString> = vec![
            CONVERT_SUBCOMMAND.into(),
            FLAG_OUT.into(),
            request.output_dir.clone().into(),
        ];

        if let Some(srs_out) = request.srs_out.as_deref().filter(|_| crs.has_crs()) {
            args.push(FLAG_SRS_OUT.into());
            args.push(srs_out.into());
            args.push(FLAG_ALWAYS_XY.into());
        }

        if let Some(extra_fields) = &request.extra_fields {
            args.push(FLAG_EXTRA_FIELDS.into());
            args.push(extra_fields.into());
        }

        args.push(working_input.into());

        Self { executable, args }
    }

    /// Arguments as displayable strings, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    pub fn transforms_crs(&self) -> bool {
        self.args.iter().any(|a| a == FLAG_SRS_OUT)
    }
}

/// What the converter left behind once it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Stdout followed by stderr.
    pub log: String,
}

impl ConverterOutput {
    /// Last lines of the captured output.
    pub fn tail(&self) -> String {
        let lines: Vec<&str> = self.log.lines().collect();
        let start = lines.len().saturating_sub(LOG_TAIL_LINES);
        lines[start..].join("\n")
    }
}

/// Seam between the pipeline and the process that does the tiling.
pub trait ConverterRunner {
    /// Runs the converter to completion. Only failure to start is an error;
    /// a non-zero exit is reported through [`ConverterOutput`].
    fn run(&self, invocation: &ConverterInvocation) -> Result<ConverterOutput>;
}

/// Runs the converter as a blocking child process with captured output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessRunner;

impl ConverterRunner for SubprocessRunner {
    fn run(&self, invocation: &ConverterInvocation) -> Result<ConverterOutput> {
        info!(
            executable = %invocation.executable.display(),
            args = ?invocation.args_lossy(),
            "Starting converter"
        );
        let start = Instant::now();

        let child = Command::new(&invocation.executable)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TilerError::Spawn {
                executable: invocation.executable.clone(),
                source,
            })?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {elapsed} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Converting to 3D Tiles");
        pb.enable_steady_tick(Duration::from_millis(120));

        let output = child
            .wait_with_output()
            .map_err(|e| TilerError::io("waiting for converter", e))?;
        pb.finish_and_clear();

        let mut log = String::from_utf8_lossy(&output.stdout).to_string();
        log.push_str(&String::from_utf8_lossy(&output.stderr));

        let result = ConverterOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            log,
        };

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            exit_code = ?result.exit_code,
            success = result.success,
            "Converter finished"
        );

        Ok(result)
    }
}

/// Finds the converter executable.
///
/// An explicit path is used when it names an existing file; a bare name is
/// searched for like the default one: next to the current executable, then
/// on `PATH`.
pub fn resolve_converter(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
    }

    let name = explicit
        .map(|p| p.as_os_str().to_owned())
        .unwrap_or_else(|| CONVERTER_EXECUTABLE.into());
    let file_name = with_exe_suffix(name.clone());

    let sibling = env::current_exe()
        .ok()
        .map(|exe| exe.with_file_name(&file_name))
        .filter(|p| p.is_file());
    if let Some(found) = sibling {
        debug!(path = %found.display(), "Converter found next to current executable");
        return Ok(found);
    }

    find_in_path(&file_name, env::var_os("PATH"))
        .ok_or_else(|| TilerError::ConverterNotFound(name.to_string_lossy().to_string()))
}

/// Searches each directory of a `PATH`-style list for `file_name`.
pub fn find_in_path(file_name: &OsString, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

fn with_exe_suffix(mut name: OsString) -> OsString {
    let suffix = env::consts::EXE_SUFFIX;
    if !suffix.is_empty() && !name.to_string_lossy().ends_with(suffix) {
        name.push(suffix);
    }
    name
}
