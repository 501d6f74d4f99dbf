//! Plain-text rendering of a ledger report.

use std::{collections::HashMap, fmt};

use engine::{Balances, BalanceStatus, LedgerReport, MemberId, PairwiseNet};

struct Names<'a>(HashMap<&'a MemberId, &'a str>);

impl<'a> Names<'a> {
    fn from_balances(balances: &'a Balances) -> Self {
        Self(
            balances
                .iter()
                .map(|entry| (&entry.member, entry.name.as_str()))
                .collect(),
        )
    }

    fn get(&self, id: &'a MemberId) -> &'a str {
        self.0.get(id).copied().unwrap_or(id.as_str())
    }
}

/// Balance table, one member per line.
pub struct BalancesText<'a>(pub &'a Balances);

impl fmt::Display for BalancesText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Balances")?;
        for entry in self.0 {
            let label = match entry.status() {
                BalanceStatus::Owed => "is owed",
                BalanceStatus::Owing => "owes",
                BalanceStatus::Settled => "settled",
            };
            let amount = entry.balance.to_string();
            writeln!(f, "  {:<16} {amount:>10}  {label}", entry.name)?;
        }
        Ok(())
    }
}

pub struct ReportText<'a>(pub &'a LedgerReport);

impl ReportText<'_> {
    fn pairwise(&self, f: &mut fmt::Formatter<'_>, names: &Names<'_>) -> fmt::Result {
        let members = self.0.matrix.members();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                match self.0.matrix.net(a, b) {
                    PairwiseNet::Owes(amount) => {
                        writeln!(f, "  {} owes {} {amount}", names.get(a), names.get(b))?;
                    }
                    PairwiseNet::Receivable(amount) => {
                        writeln!(f, "  {} owes {} {amount}", names.get(b), names.get(a))?;
                    }
                    PairwiseNet::Settled => {}
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let names = Names::from_balances(&report.balances);

        write!(f, "{}", BalancesText(&report.balances))?;

        writeln!(f, "\nSettlement plan")?;
        if report.is_settled() {
            writeln!(f, "  everyone is settled up")?;
        }
        for tx in report.plan.iter() {
            writeln!(
                f,
                "  {} pays {} {}",
                names.get(&tx.from),
                names.get(&tx.to),
                tx.amount
            )?;
        }

        writeln!(f, "\nWho owes whom")?;
        self.pairwise(f, &names)?;

        writeln!(f, "\nMembers")?;
        for summary in &report.summaries {
            writeln!(
                f,
                "  {}: paid {}, share {}, owes {}, will collect {}{}",
                summary.name,
                summary.total_paid,
                summary.total_share,
                summary.total_owes(),
                summary.will_collect(),
                if summary.is_clear() { " (clear)" } else { "" }
            )?;
        }

        if !report.history.is_empty() {
            writeln!(f, "\nPaid")?;
            for paid in &report.history {
                writeln!(
                    f,
                    "  {} {} paid {} {} for {} ({})",
                    paid.paid_at.format("%Y-%m-%d"),
                    paid.member_name,
                    paid.payer_name,
                    paid.share,
                    paid.description,
                    paid.expense
                )?;
            }
        }

        if !report.warnings.is_empty() {
            writeln!(f, "\nWarnings")?;
            for warning in &report.warnings {
                writeln!(f, "  {warning}")?;
            }
        }
        Ok(())
    }
}
