//! The `run` command.

use quill_eval::Interpreter;

use super::{fail, read_file};
use crate::{load_prelude, run_source};

/// Flags accepted after `quillc run <file>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip the prelude; only intrinsics are available.
    pub no_prelude: bool,
    pub step_limit: Option<u64>,
}

/// Parse `run` flags. Unknown flags and bad numbers are reported as errors.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    for arg in args {
        if arg == "--no-prelude" {
            options.no_prelude = true;
        } else if let Some(limit) = arg.strip_prefix("--step-limit=") {
            let limit = limit
                .parse()
                .map_err(|_| format!("invalid step limit '{limit}'"))?;
            options.step_limit = Some(limit);
        } else {
            return Err(format!("unknown option '{arg}'"));
        }
    }
    Ok(options)
}

pub fn run_file(path: &str, options: &RunOptions) {
    let content = read_file(path);

    let mut builder = Interpreter::builder();
    if let Some(limit) = options.step_limit {
        builder = builder.step_limit(limit);
    }
    let mut interpreter = builder.build();

    if !options.no_prelude {
        if let Err(e) = load_prelude(&mut interpreter) {
            fail("<prelude>", &e);
        }
    }
    let result = run_source(&mut interpreter, &content);
    // Flush whatever the program printed before reporting.
    let _ = interpreter.output().flush();
    if let Err(e) = result {
        fail(path, &e);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn defaults_run_with_prelude_and_no_limit() {
        assert_eq!(parse_run_options(&[]).unwrap(), RunOptions::default());
    }

    #[test]
    fn flags_are_parsed() {
        let options = parse_run_options(&args(&["--no-prelude", "--step-limit=500"])).unwrap();
        assert_eq!(
            options,
            RunOptions {
                no_prelude: true,
                step_limit: Some(500),
            }
        );
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert_eq!(
            parse_run_options(&args(&["--step-limit=lots"])),
            Err("invalid step limit 'lots'".to_owned())
        );
        assert_eq!(
            parse_run_options(&args(&["--fast"])),
            Err("unknown option '--fast'".to_owned())
        );
    }
}
