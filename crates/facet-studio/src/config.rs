use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
usage: facet-studio [options]

  --objects <n>     number of procedural objects (default 80)
  --seed <n>        spawn seed (default 1337)
  --model <path>    glTF model to place at the origin
  --texture <path>  image skinning the textured boxes
  --shaders <dir>   directory with the WGSL shaders
  --no-vsync        present as fast as the backend allows
  --log <filter>    log filter, overriding RUST_LOG
  -h, --help        print this message";

/// Command-line configuration of the studio.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    pub object_count: usize,
    pub seed: u32,
    pub model_path: Option<PathBuf>,
    pub texture_path: Option<PathBuf>,
    pub shader_dir: PathBuf,
    pub vsync: bool,
    pub log_filter: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            object_count: 80,
            seed: 1337,
            model_path: None,
            texture_path: None,
            shader_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders")),
            vsync: true,
            log_filter: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(StudioConfig),
    Help,
}

impl StudioConfig {
    /// Parses arguments, not including the program name.
    pub fn parse<I>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = StudioConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} expects a value"))
            };
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--objects" => {
                    let v = value("--objects")?;
                    config.object_count = v
                        .parse()
                        .with_context(|| format!("invalid object count `{v}`"))?;
                }
                "--seed" => {
                    let v = value("--seed")?;
                    config.seed = v.parse().with_context(|| format!("invalid seed `{v}`"))?;
                }
                "--model" => config.model_path = Some(value("--model")?.into()),
                "--texture" => config.texture_path = Some(value("--texture")?.into()),
                "--shaders" => config.shader_dir = value("--shaders")?.into(),
                "--no-vsync" => config.vsync = false,
                "--log" => config.log_filter = Some(value("--log")?),
                other => bail!("unknown argument `{other}`\n\n{USAGE}"),
            }
        }

        Ok(Command::Run(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        StudioConfig::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(StudioConfig::default()));
    }

    #[test]
    fn reads_every_option() {
        let Command::Run(config) = parse(&[
            "--objects", "12", "--seed", "7", "--model", "nano.gltf", "--texture", "cube.png",
            "--shaders", "/tmp/wgsl", "--no-vsync", "--log", "facet_engine=debug",
        ])
        .unwrap() else {
            panic!("expected a run command");
        };
        assert_eq!(config.object_count, 12);
        assert_eq!(config.seed, 7);
        assert_eq!(config.model_path, Some(PathBuf::from("nano.gltf")));
        assert_eq!(config.texture_path, Some(PathBuf::from("cube.png")));
        assert_eq!(config.shader_dir, PathBuf::from("/tmp/wgsl"));
        assert!(!config.vsync);
        assert_eq!(config.log_filter.as_deref(), Some("facet_engine=debug"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--objects", "many"]).is_err());
        assert!(parse(&["--seed"]).is_err());
        assert!(parse(&["--fullscreen"]).is_err());
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse(&["--seed", "3", "--help"]).unwrap(), Command::Help);
    }
}
