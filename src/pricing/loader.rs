use crate::pricing::error::CostError;
use crate::pricing::models::{FeeTable, PriceSheet};
use std::path::Path;
use tracing::{debug, info};

/// Price sheet document formats
///
/// Category keys are kept exactly as written; rate tables are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    /// Format implied by a file extension (`.yaml`/`.yml`, `.toml`, `.json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load a price sheet from a file
///
/// The format follows the file extension. The file is read fully before
/// parsing, so the handle is closed on every exit path.
pub fn load_price_sheet(path: &Path) -> Result<PriceSheet, CostError> {
    let source_name = path.display().to_string();
    info!("Loading price sheet from: {}", source_name);

    if !path.is_file() {
        return Err(CostError::config_load(source_name, "file not found"));
    }

    let format = FileFormat::from_path(path).ok_or_else(|| {
        CostError::config_load(
            &source_name,
            "unsupported extension (expected .yaml, .yml, .toml or .json)",
        )
    })?;

    let document =
        std::fs::read_to_string(path).map_err(|e| CostError::config_load(&source_name, e))?;
    let sheet = parse_document(&document, format, &source_name)?;

    debug!(
        "Price sheet {} loaded: {} lease, {} exec, {} transfer categories",
        sheet.version.as_deref().unwrap_or("(unversioned)"),
        sheet.lease_fee.len(),
        sheet.exec_fee.len(),
        sheet.transfer_fee.len()
    );
    Ok(sheet)
}

/// Parse a price sheet from an in-memory document
pub fn parse_price_sheet(document: &str, format: FileFormat) -> Result<PriceSheet, CostError> {
    parse_document(document, format, "<inline>")
}

fn parse_document(
    document: &str,
    format: FileFormat,
    source_name: &str,
) -> Result<PriceSheet, CostError> {
    let sheet: PriceSheet = match format {
        FileFormat::Yaml => serde_yaml::from_str(document).map_err(|e| e.to_string()),
        FileFormat::Toml => toml::from_str(document).map_err(|e| e.to_string()),
        FileFormat::Json => serde_json::from_str(document).map_err(|e| e.to_string()),
    }
    .map_err(|reason| CostError::config_load(source_name, reason))?;

    validate_price_sheet(&sheet).map_err(|reason| CostError::config_load(source_name, reason))?;
    Ok(sheet)
}

/// Reject negative or non-finite rates
fn validate_price_sheet(sheet: &PriceSheet) -> Result<(), String> {
    for table in [FeeTable::Lease, FeeTable::Exec, FeeTable::Transfer] {
        for (category, rate) in sheet.table(table) {
            check_rate(&format!("{}.{}", table, category), *rate)?;
        }
    }
    check_rate("trigger_fee", sheet.trigger_fee)?;
    check_rate("acq_cost", sheet.acq_cost)?;
    Ok(())
}

fn check_rate(name: &str, rate: f64) -> Result<(), String> {
    if !rate.is_finite() {
        return Err(format!("{} must be a finite number", name));
    }
    if rate < 0.0 {
        return Err(format!("{} must be non-negative, got {}", name, rate));
    }
    Ok(())
}

/// Check that every expected category has a lease and an exec rate
pub fn ensure_categories(sheet: &PriceSheet, expected: &[String]) -> Result<(), CostError> {
    for category in expected {
        for table in [FeeTable::Lease, FeeTable::Exec] {
            if !sheet.table(table).contains_key(category) {
                return Err(CostError::config_load(
                    "price sheet",
                    format!("expected category '{}' missing from {}", category, table),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHEET_YAML: &str = r#"
version: "2024-q3"
lease_fee:
  standard: 2.0
  premium: 3.5
exec_fee:
  standard: 0.5
  premium: 0.75
trigger_fee: 0.1
acq_cost: 10
transfer_fee:
  premium: 5.0
"#;

    #[test]
    fn test_parse_yaml_sheet() {
        let sheet = parse_price_sheet(SHEET_YAML, FileFormat::Yaml).unwrap();
        assert_eq!(sheet.lease_fee["standard"], 2.0);
        assert_eq!(sheet.exec_fee["premium"], 0.75);
        assert_eq!(sheet.trigger_fee, 0.1);
        assert_eq!(sheet.acq_cost, 10.0);
        assert_eq!(sheet.transfer_fee["premium"], 5.0);
        assert_eq!(sheet.version.as_deref(), Some("2024-q3"));
    }

    #[test]
    fn test_parse_json_sheet() {
        let json = r#"{
            "lease_fee": {"standard": 2.0},
            "exec_fee": {"standard": 0.5},
            "trigger_fee": 0.1,
            "acq_cost": 10.0,
            "transfer_fee": {"premium": 5.0}
        }"#;
        let sheet = parse_price_sheet(json, FileFormat::Json).unwrap();
        assert_eq!(sheet.lease_fee.len(), 1);
        assert!(sheet.version.is_none());
    }

    #[test]
    fn test_missing_key_is_config_load_error() {
        let yaml = "lease_fee:\n  standard: 2.0\nexec_fee:\n  standard: 0.5\ntrigger_fee: 0.1\nacq_cost: 10.0\n";
        let err = parse_price_sheet(yaml, FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, CostError::ConfigLoad { .. }));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let yaml = SHEET_YAML.replace("trigger_fee: 0.1", "trigger_fee: -0.1");
        let err = parse_price_sheet(&yaml, FileFormat::Yaml).unwrap_err();
        match err {
            CostError::ConfigLoad { reason, .. } => assert!(reason.contains("trigger_fee")),
            other => panic!("Expected ConfigLoad, got {:?}", other),
        }

        let yaml = SHEET_YAML.replace("premium: 0.75", "premium: -0.75");
        let err = parse_price_sheet(&yaml, FileFormat::Yaml).unwrap_err();
        match err {
            CostError::ConfigLoad { reason, .. } => assert!(reason.contains("exec_fee.premium")),
            other => panic!("Expected ConfigLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document_rejected() {
        let err = parse_price_sheet("lease_fee: [not, a, map", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, CostError::ConfigLoad { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_sheet.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SHEET_YAML.as_bytes()).unwrap();
        drop(file);

        let sheet = load_price_sheet(&path).unwrap();
        assert_eq!(sheet.lease_fee["premium"], 3.5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_price_sheet(&dir.path().join("absent.yaml")).unwrap_err();
        match err {
            CostError::ConfigLoad { reason, .. } => assert_eq!(reason, "file not found"),
            other => panic!("Expected ConfigLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_category_case_is_preserved() {
        let yaml = "lease_fee:\n  Premium: 4.0\n  premium: 3.0\n  standard: 2.0\nexec_fee:\n  Premium: 1.0\ntrigger_fee: 0.1\nacq_cost: 10.0\ntransfer_fee: {}\n";
        let sheet = parse_price_sheet(yaml, FileFormat::Yaml).unwrap();

        let keys: Vec<&str> = sheet.lease_fee.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Premium", "premium", "standard"]);
        assert_eq!(sheet.lease_fee["Premium"], 4.0);
        assert_eq!(sheet.lease_fee["premium"], 3.0);
        assert!(!sheet.exec_fee.contains_key("premium"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("sheet.yml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("sheet.YAML")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("sheet.toml")), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_path(Path::new("sheet.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("sheet.ini")), None);
        assert_eq!(FileFormat::from_path(Path::new("sheet")), None);
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_sheet.txt");
        std::fs::write(&path, SHEET_YAML).unwrap();

        let err = load_price_sheet(&path).unwrap_err();
        assert!(matches!(err, CostError::ConfigLoad { .. }));
    }

    #[test]
    fn test_ensure_categories() {
        let sheet = parse_price_sheet(SHEET_YAML, FileFormat::Yaml).unwrap();
        assert!(ensure_categories(&sheet, &["standard".to_string(), "premium".to_string()]).is_ok());

        let err = ensure_categories(&sheet, &["economy".to_string()]).unwrap_err();
        assert!(err.to_string().contains("economy"));
    }
}
