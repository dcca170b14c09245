use anyhow::Context;
use parkcore::config::ClientConfig;
use std::fs;
use std::path::Path;

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<ClientConfig> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading monitor config {}", path_ref.display()))?;
    let config: ClientConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing monitor config {}", path_ref.display()))?;
    Ok(config)
}

/// File (or defaults), then `PARKING_BASE_URL`, then the `--base-url` flag.
pub fn resolve<P: AsRef<Path>>(
    path: Option<P>,
    base_url: Option<String>,
) -> anyhow::Result<ClientConfig> {
    let config = match path {
        Some(path) => load(path)?,
        None => ClientConfig::default(),
    };
    let config = config
        .with_env_overrides()
        .with_base_url_override(base_url);
    config.validate().context("validating monitor config")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkcore::model::Basement;
    use parkcore::sync::ResponseOrdering;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"base_url: http://192.168.1.20:8080/firstParkingBackEnd\n\
              cadence:\n  map_ms: 5000\n\
              ordering: latest_requested\n\
              section_names:\n  basement_2: [NORTH RAMP]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = load(&path).unwrap();
        assert_eq!(
            cfg.gateway.base_url,
            "http://192.168.1.20:8080/firstParkingBackEnd"
        );
        assert_eq!(cfg.gateway.timeout_ms, 10_000);
        assert_eq!(cfg.cadence.map_ms, 5_000);
        assert_eq!(cfg.cadence.summary_ms, 30_000);
        assert_eq!(cfg.ordering, ResponseOrdering::LatestRequested);
        assert_eq!(
            cfg.section_names.for_basement(Basement::Two),
            ["NORTH RAMP".to_string()]
        );
        assert_eq!(cfg.section_names.for_basement(Basement::One).len(), 9);
    }

    #[test]
    fn flag_wins_over_file_and_bad_values_are_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"base_url: http://file.example\ntimeout_ms: 0\n")
            .unwrap();
        let path = temp.into_temp_path();
        let err = resolve(Some(&path), Some("http://flag.example".into())).unwrap_err();
        assert!(format!("{err:#}").contains("timeout_ms"));

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"base_url: http://file.example\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = resolve(Some(&path), Some("http://flag.example".into())).unwrap();
        assert_eq!(cfg.gateway.base_url, "http://flag.example");
    }
}
