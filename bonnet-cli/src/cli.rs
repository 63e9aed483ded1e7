use self::joints::JointArgs;
use std::path::PathBuf;

mod cmd;
mod joints;

const APP_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(clap::Parser)]
#[clap(name = APP_NAME, version, about)]
pub(crate) struct Entry {
    /// Show debug logs, `RUST_LOG` takes precedence
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(flatten)]
    joints: JointArgs,
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Dump the lookup table in CSV format
    Table {
        /// Output path, default to stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the travel range of the mechanism
    Range,
    /// Resolve a pose from the bonnet angle or the input offset
    Pose {
        /// Bonnet opening angle (degrees)
        #[clap(long, allow_negative_numbers = true, conflicts_with = "offset")]
        angle: Option<f64>,
        /// Input crank offset (degrees)
        #[clap(long, allow_negative_numbers = true)]
        offset: Option<f64>,
    },
    /// Plot the motion envelope in SVG format
    Plot {
        /// Output path
        #[clap(short, long, default_value = "bonnet.svg")]
        output: PathBuf,
        /// Plot the angle curve instead of the linkage
        #[clap(long)]
        curve: bool,
        /// Highlight the pose at this bonnet angle, default to the widest opening
        #[clap(long, allow_negative_numbers = true)]
        angle: Option<f64>,
    },
    /// Save the joint coordinates as a RON project file
    Save {
        /// Output path
        file: PathBuf,
    },
}

/// Errors of the command line.
#[derive(Debug)]
pub(crate) enum CliErr {
    // Reading or writing file error
    Io(std::io::Error),
    // Project file parsing error
    RonDe(ron::error::SpannedError),
    // Project file serialization error
    RonSer(ron::Error),
    // Table dumping error
    Dump(Box<dyn std::error::Error>),
    // Drawing error
    Plot(String),
}

impl std::fmt::Display for CliErr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "file error: {e}"),
            Self::RonDe(e) => write!(f, "ron parsing error: {e}"),
            Self::RonSer(e) => write!(f, "ron serialization error: {e}"),
            Self::Dump(e) => write!(f, "csv serialization error: {e}"),
            Self::Plot(e) => write!(f, "plotting error: {e}"),
        }
    }
}

impl std::error::Error for CliErr {}

macro_rules! impl_from {
    ($($var:ident($ty:ty)),+ $(,)?) => {$(
        impl From<$ty> for CliErr {
            fn from(e: $ty) -> Self {
                Self::$var(e)
            }
        }
    )+};
}

impl_from!(
    Io(std::io::Error),
    RonDe(ron::error::SpannedError),
    RonSer(ron::Error),
    Dump(Box<dyn std::error::Error>),
);

pub(crate) type CliResult<T = ()> = Result<T, CliErr>;

impl Entry {
    pub(crate) fn main() {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        init_logger(entry.verbose);
        register_panic_hook();
        if let Err(e) = entry.run() {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }

    fn run(self) -> CliResult {
        let Self { joints, cmd: command, .. } = self;
        let model = || joints.load().map(bonnet::Model::new);
        match command {
            Cmd::Table { output } => cmd::table(&model()?, output),
            Cmd::Range => cmd::range(&model()?),
            Cmd::Pose { angle, offset } => cmd::pose(model()?, angle, offset),
            Cmd::Plot { output, curve, angle } => cmd::plot(model()?, &output, curve, angle),
            Cmd::Save { file } => joints.save(&file),
        }
    }
}

fn init_logger(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn register_panic_hook() {
    // Print panic messages without stack trace
    std::panic::set_hook(Box::new(|info| {
        match info.payload().downcast_ref::<&str>() {
            Some(s) => eprintln!("{s}"),
            None => eprintln!("{info}"),
        }
        std::process::exit(1);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn joint_flags_after_subcommand() {
        let entry = Entry::try_parse_from(["bonnet", "pose", "--angle", "30", "--iz", "-5"]).unwrap();
        assert!(matches!(entry.cmd, Cmd::Pose { angle: Some(a), offset: None } if a == 30.));
        assert_eq!(entry.joints.flags().get("iz"), Some("-5"));
    }

    #[test]
    fn pose_takes_one_control() {
        let args = ["bonnet", "pose", "--angle", "30", "--offset", "-10"];
        assert!(Entry::try_parse_from(args).is_err());
        let entry = Entry::try_parse_from(["bonnet", "pose", "--offset", "-10"]).unwrap();
        assert!(matches!(entry.cmd, Cmd::Pose { angle: None, offset: Some(o) } if o == -10.));
    }
}
