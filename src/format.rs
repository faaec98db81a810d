//! Text rendering of a fixture table, optionally with team names.

use crate::decode::{Fixture, FixtureTable};
use crate::error::Result;
use crate::vars::TeamId;
use itertools::Itertools;
use std::io::BufRead;
use std::path::Path;

/// Display names for team indices. Purely cosmetic: the table itself stays index based.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamNames {
    names: Vec<String>,
}

impl TeamNames {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        TeamNames {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// One name per non-empty line.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut names = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let name = line.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
        Ok(TeamNames { names })
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        TeamNames::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of `team`, falling back to its index.
    pub fn name(&self, team: TeamId) -> String {
        self.names.get(team).cloned().unwrap_or_else(|| team.to_string())
    }
}

/// Cell text: the opponent when hosting, `@opponent` when visiting, empty when unknown.
pub fn cell_label(fixture: Option<Fixture>, names: Option<&TeamNames>) -> String {
    let label = |t: TeamId| names.map(|n| n.name(t)).unwrap_or_else(|| t.to_string());
    match fixture {
        Some(Fixture::Home(t)) => label(t),
        Some(Fixture::Away(t)) => format!("@{}", label(t)),
        None => String::new(),
    }
}

/// The table as rows of labels, one row per team, first column the team itself.
pub fn labelled_rows(table: &FixtureTable, names: Option<&TeamNames>) -> Vec<Vec<String>> {
    (0..table.teams())
        .map(|team| {
            let own = names.map(|n| n.name(team)).unwrap_or_else(|| team.to_string());
            std::iter::once(own)
                .chain(table.row(team).iter().map(|f| cell_label(*f, names)))
                .collect()
        })
        .collect()
}

pub fn format_schedule(table: &FixtureTable, names: Option<&TeamNames>) -> String {
    let rows = labelled_rows(table, names);
    let header = std::iter::once("Team".to_string())
        .chain((0..table.rounds()).map(|r| format!("r{}", r)))
        .collect::<Vec<_>>();

    let widths = (0..header.len())
        .map(|c| {
            rows.iter()
                .map(|r| r[c].len())
                .chain(std::iter::once(header[c].len()))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let mut out = String::new();
    for line in std::iter::once(&header).chain(rows.iter()) {
        let cells = line
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(c, (text, w))| {
                if c == 0 {
                    format!("{:<w$}", text, w = *w)
                } else {
                    format!("{:>w$}", text, w = *w)
                }
            })
            .join(" ");
        out.push_str(cells.trim_end());
        out.push('\n');
    }
    out
}
