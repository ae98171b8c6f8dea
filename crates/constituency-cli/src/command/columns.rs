use clap::Args;
use constituency_analytics::view::AnalysisKind;
use constituency_model::Column;

#[derive(Default, Debug, Clone, Args)]
pub(crate) struct ColumnsArg {
    /// Also list the analysis kinds accepted by `view --kind`
    #[arg(long)]
    kinds: bool,
}

pub(crate) fn run(arg: &ColumnsArg) {
    let columns = Column::all();
    let width = columns
        .iter()
        .map(|column| column.id().len())
        .max()
        .unwrap_or(0);
    for column in &columns {
        println!("{:<width$}  {}", column.id(), column.label());
    }
    if arg.kinds {
        println!();
        for kind in AnalysisKind::ALL {
            println!("{kind}");
        }
    }
}
