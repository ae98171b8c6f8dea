use std::path::PathBuf;

use clap::Args;
use constituency_analytics::{
    config::{AnalyticsConfig, LabelingMode},
    view::{AnalysisKind, Analytics, PartyFilter, RowLimit, ViewFilter, ViewParams},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ViewArg {
    /// Path to the constituency records JSON file
    pub records: PathBuf,

    /// View to compute (e.g. `cluster_distribution`, `contestationTable`)
    #[arg(long)]
    pub kind: AnalysisKind,

    /// Keep only constituencies in this country
    #[arg(long)]
    pub country: Option<String>,

    /// Keep only constituencies in this region
    #[arg(long)]
    pub region: Option<String>,

    /// Party for contestation and regional views, or `All`
    #[arg(long, default_value = "All")]
    pub party: PartyFilter,

    /// Maximum number of rows returned, or `All`
    #[arg(long, default_value = "All")]
    pub limit: RowLimit,

    /// Column exposed per row; required by `cluster_by_variable`
    #[arg(long)]
    pub target: Option<String>,

    /// Analytics configuration JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the clustering seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override how clusters are mapped to segment labels
    #[arg(long)]
    pub labeling: Option<LabelingMode>,

    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ViewArg) -> anyhow::Result<()> {
    let mut config = match &arg.config {
        Some(path) => util::read_config_file(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(seed) = arg.seed {
        config.clustering.seed = seed;
    }
    if let Some(labeling) = arg.labeling {
        config.labeling = labeling;
    }

    eprintln!("Loading records from {}...", arg.records.display());
    let records = util::read_records_file(&arg.records)?;
    eprintln!("Loaded {} constituencies", records.len());

    let filter = ViewFilter {
        country: arg.country.clone(),
        region: arg.region.clone(),
        party: arg.party,
        row_limit: arg.limit,
    };
    let params = ViewParams {
        target_variable: arg.target.clone(),
    };

    eprintln!("Computing {} view...", arg.kind);
    let bundle = Analytics::new(&records, &config).compute_view(&filter, arg.kind, &params)?;
    if bundle.is_empty_cohort() {
        eprintln!("No constituencies match the filter");
    } else {
        eprintln!(
            "Computed view over {} constituencies ({} rows)",
            bundle.cohort_size,
            bundle.rows.len()
        );
    }

    Output::save_json(&bundle, arg.output.clone())?;
    Ok(())
}
