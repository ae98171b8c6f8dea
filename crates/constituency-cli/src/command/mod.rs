use clap::{Parser, Subcommand};

use self::{columns::ColumnsArg, view::ViewArg};

mod columns;
mod view;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute one analytic view and write it as JSON
    View(#[clap(flatten)] ViewArg),
    /// List the columns usable as a target variable
    Columns(#[clap(flatten)] ColumnsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::View(arg) => view::run(&arg)?,
        Mode::Columns(arg) => columns::run(&arg),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use constituency_analytics::view::{AnalysisKind, PartyFilter, RowLimit};
    use constituency_model::Party;

    use super::*;

    #[test]
    fn test_parse_view_command() {
        let args = CommandArgs::try_parse_from([
            "constituency",
            "view",
            "records.json",
            "--kind",
            "contestationTable",
            "--country",
            "Scotland",
            "--party",
            "snp",
            "--limit",
            "10",
        ])
        .unwrap();
        let Mode::View(arg) = args.mode else {
            panic!("expected view command");
        };
        assert_eq!(arg.kind, AnalysisKind::ContestationTable);
        assert_eq!(arg.country.as_deref(), Some("Scotland"));
        assert_eq!(arg.party, PartyFilter::Party(Party::ScottishNationalParty));
        assert_eq!(arg.limit, "10".parse::<RowLimit>().unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_limit() {
        let result = CommandArgs::try_parse_from([
            "constituency",
            "view",
            "records.json",
            "--kind",
            "regional_votes",
            "--limit",
            "0",
        ]);
        assert!(result.is_err());
    }
}
