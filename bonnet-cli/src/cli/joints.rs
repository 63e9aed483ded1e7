use super::CliResult;
use bonnet::{coerce, JointParams, JointSet, Raw, PARAM_KEYS};
use ron::{extensions::Extensions, ser::PrettyConfig};
use std::path::{Path, PathBuf};

macro_rules! joint_flags {
    ($($(#[doc = $doc:literal])+ $key:ident),+ $(,)?) => {
        /// Joint coordinates from a project file and the command line.
        #[derive(clap::Args, Default)]
        pub(super) struct JointArgs {
            /// RON project file of the joint coordinates, flags override it
            #[clap(short, long, global = true)]
            file: Option<PathBuf>,
            $(
                $(#[doc = $doc])+
                #[clap(long, global = true, allow_hyphen_values = true)]
                $key: Option<String>,
            )+
        }

        impl JointArgs {
            /// The coordinates given by flags.
            pub(super) fn flags(&self) -> JointParams {
                JointParams { $($key: self.$key.clone()),+ }
            }
        }
    };
}

joint_flags!(
    /// Input joint X
    ix,
    /// Input joint Y
    iy,
    /// Input joint Z
    iz,
    /// Input-Coupler joint X
    icx,
    /// Input-Coupler joint Y
    icy,
    /// Input-Coupler joint Z
    icz,
    /// Coupler-Output joint X
    cox,
    /// Coupler-Output joint Y
    coy,
    /// Coupler-Output joint Z
    coz,
    /// Output joint X
    ox,
    /// Output joint Y
    oy,
    /// Output joint Z
    oz,
);

impl JointArgs {
    /// Merge the project file and the flags.
    ///
    /// Return `None` if nothing is given.
    fn params(&self) -> CliResult<Option<JointParams>> {
        let mut params = match &self.file {
            Some(path) => read_project(path)?,
            None => JointParams::default(),
        };
        params.merge(self.flags());
        Ok((!params.is_empty()).then_some(params))
    }

    /// Load the joint set, default to the placeholder mechanism.
    pub(super) fn load(&self) -> CliResult<JointSet> {
        let Some(params) = self.params()? else {
            tracing::info!("no joint coordinates given, use the placeholder mechanism");
            return Ok(JointSet::example());
        };
        let invalid = invalid_keys(&params);
        if !invalid.is_empty() {
            tracing::warn!("missing or invalid coordinates: {}", invalid.join(", "));
        }
        Ok(JointSet::from_params(&params))
    }

    /// Save the merged coordinates as a project file.
    pub(super) fn save(&self, path: &Path) -> CliResult {
        let params = self.params()?.unwrap_or_else(example_params);
        let cfg = PrettyConfig::new().extensions(Extensions::IMPLICIT_SOME);
        std::fs::write(path, ron::ser::to_string_pretty(&params, cfg)?)?;
        tracing::info!("saved to {}", path.display());
        Ok(())
    }
}

fn read_project(path: &Path) -> CliResult<JointParams> {
    tracing::debug!("load project {}", path.display());
    let s = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&s)?)
}

fn invalid_keys(params: &JointParams) -> Vec<&'static str> {
    PARAM_KEYS
        .iter()
        .zip(params.values())
        .filter(|(_, v)| coerce(Raw::from(v.as_deref())).is_none())
        .map(|(k, _)| *k)
        .collect()
}

fn example_params() -> JointParams {
    let mut params = JointParams::default();
    let js = JointSet::example();
    let coords = js.joints.iter().flat_map(|v| v.0);
    for (key, c) in PARAM_KEYS.iter().zip(coords) {
        if let Some(c) = c {
            params.set(key, c.to_string());
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_nothing_else() {
        let args = JointArgs {
            ix: Some("1".to_string()),
            oz: Some("x".to_string()),
            ..Default::default()
        };
        let params = args.params().unwrap().unwrap();
        assert_eq!(params.get("ix"), Some("1"));
        assert_eq!(params.get("iy"), None);
        let invalid = invalid_keys(&params);
        assert_eq!(invalid.len(), 11);
        assert!(invalid.contains(&"oz"));
        assert!(!invalid.contains(&"ix"));
        assert!(!args.load().unwrap().is_valid());
    }

    #[test]
    fn empty_args_use_placeholder() {
        let args = JointArgs::default();
        assert_eq!(args.params().unwrap(), None);
        assert_eq!(args.load().unwrap(), JointSet::example());
        assert_eq!(JointSet::from_params(&example_params()), JointSet::example());
    }

    #[test]
    fn project_round_trip() {
        let name = format!("bonnet-cli-project-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        JointArgs::default().save(&path).unwrap();
        let args = JointArgs {
            file: Some(path.clone()),
            oz: Some("2000".to_string()),
            ..Default::default()
        };
        let js = args.load().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(js.joints[3].resolve(), Some([1690., 0., 2000.]));
        assert_eq!(js.joints[..3], JointSet::example().joints[..3]);
    }
}
