use crate::pricing::calculator::CostModel;
use crate::pricing::error::CostError;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Holds the live cost model and swaps it on reload
///
/// Readers take an `Arc` snapshot; a reload builds a complete new model
/// before the swap, so a failed reload leaves the old model in place.
pub struct PricingService {
    sheet_path: PathBuf,
    expected_categories: Vec<String>,
    model: ArcSwap<CostModel>,
}

impl PricingService {
    /// Load the price sheet and create the service
    pub fn load(
        sheet_path: impl Into<PathBuf>,
        expected_categories: Vec<String>,
    ) -> Result<Self, CostError> {
        let sheet_path = sheet_path.into();
        let model = CostModel::from_path_with_categories(&sheet_path, &expected_categories)?;
        info!(
            "Price sheet loaded from {} ({} lease categories)",
            sheet_path.display(),
            model.sheet().lease_fee.len()
        );

        Ok(Self {
            sheet_path,
            expected_categories,
            model: ArcSwap::from_pointee(model),
        })
    }

    /// Wrap an already built model; `reload` still reads from `sheet_path`
    pub fn from_model(sheet_path: impl Into<PathBuf>, model: CostModel) -> Self {
        Self {
            sheet_path: sheet_path.into(),
            expected_categories: Vec::new(),
            model: ArcSwap::from_pointee(model),
        }
    }

    /// Snapshot of the current model
    pub fn current(&self) -> Arc<CostModel> {
        self.model.load_full()
    }

    pub fn sheet_path(&self) -> &Path {
        &self.sheet_path
    }

    /// Rebuild the model from the sheet file and swap it in
    pub fn reload(&self) -> Result<(), CostError> {
        let model =
            CostModel::from_path_with_categories(&self.sheet_path, &self.expected_categories)?;
        let version = model.sheet().version.clone();
        self.model.store(Arc::new(model));
        info!(
            "Price sheet reloaded from {} (version: {})",
            self.sheet_path.display(),
            version.as_deref().unwrap_or("unversioned")
        );
        Ok(())
    }
}
