//! Reporting on finished runs
//!
//! Consumes the read-only [`SimulationOutcome`] and turns it into:
//! - a terminal chart of the S/I/R curves
//! - CSV and JSON exports of the daily history
//! - a JSON sample of the network (first K nodes, their edges and terminal
//!   statuses) for external graph renderers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ReportError;
use crate::history::{History, HistoryEntry};
use crate::simulation::{SimStats, SimulationOutcome};
use crate::topology::DegreeSummary;
use crate::types::{HealthStatus, NodeId};

/// Draw the S/I/R curves as text, one column per (sampled) day
///
/// Where curves overlap, `I` is drawn over `R` over `S`.
pub fn render_chart(history: &History, width: usize, height: usize) -> String {
    let mut output = String::new();
    if history.is_empty() || width == 0 || height < 2 {
        output.push_str("(no history recorded)\n");
        return output;
    }

    let entries = history.entries();
    let columns = width.min(entries.len());
    let population = history.population().max(1);
    let level = |value: usize| value * (height - 1) / population;

    let mut grid = vec![vec![' '; columns]; height];
    for column in 0..columns {
        let entry = &entries[column * entries.len() / columns];
        for status in [HealthStatus::Susceptible, HealthStatus::Recovered, HealthStatus::Infected] {
            let row = height - 1 - level(entry.count(status));
            grid[row][column] = status.code();
        }
    }

    let label_width = population.to_string().len();
    for (row, cells) in grid.iter().enumerate() {
        let label = if row == 0 {
            population.to_string()
        } else if row == height - 1 {
            "0".to_string()
        } else {
            String::new()
        };
        let line: String = cells.iter().collect();
        output.push_str(&format!("{:>width$} |{}\n", label, line.trim_end(), width = label_width));
    }
    output.push_str(&format!(
        "{:>width$} +{}\n",
        "",
        "-".repeat(columns),
        width = label_width
    ));
    output.push_str(&format!(
        "{:>width$}  day 0 .. {}   (S susceptible, I infected, R recovered)\n",
        "",
        entries.len() - 1,
        width = label_width
    ));
    output
}

/// Short human-readable summary of a run
pub fn summary(outcome: &SimulationOutcome) -> String {
    let mut output = String::new();
    let degrees = outcome.graph.degree_summary();
    let final_counts = outcome.final_counts();

    output.push_str(&format!(
        "Network: {} nodes, {} edges (degree min {}, mean {:.2}, max {})\n",
        outcome.graph.node_count(),
        outcome.graph.edge_count(),
        degrees.min,
        degrees.mean,
        degrees.max
    ));
    output.push_str(&format!(
        "Outbreak: patient zero {}, seed {}, {} days\n",
        outcome.patient_zero,
        outcome.seed,
        outcome.history.len()
    ));
    if let Some((day, infected)) = outcome.history.peak() {
        output.push_str(&format!("Peak: {} infected on day {}\n", infected, day));
    }
    if let Some(day) = outcome.stats.extinction_day {
        output.push_str(&format!("Extinct from day {}\n", day));
    }
    output.push_str(&format!(
        "Final: {} susceptible, {} infected, {} recovered\n",
        final_counts.susceptible, final_counts.infected, final_counts.recovered
    ));
    output
}

/// Write the history as CSV (`day,susceptible,infected,recovered`)
pub fn write_csv<W: Write>(history: &History, mut writer: W) -> Result<(), ReportError> {
    writeln!(writer, "day,susceptible,infected,recovered")?;
    for entry in history.entries() {
        writeln!(
            writer,
            "{},{},{},{}",
            entry.day, entry.susceptible, entry.infected, entry.recovered
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the history as CSV to a file
pub fn save_csv(history: &History, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_csv(history, BufWriter::new(file))
}

/// Serializable summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub population: usize,
    pub attachment_degree: usize,
    pub infection_rate: f64,
    pub recovery_rate: f64,
    pub steps: u64,
    pub patient_zero: NodeId,
    pub edges: usize,
    pub degrees: DegreeSummary,
    pub attack_rate: f64,
    pub stats: &'a SimStats,
    pub history: &'a [HistoryEntry],
}

impl<'a> RunReport<'a> {
    pub fn new(outcome: &'a SimulationOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            seed: outcome.seed,
            population: outcome.config.population,
            attachment_degree: outcome.config.attachment_degree,
            infection_rate: outcome.config.infection_rate,
            recovery_rate: outcome.config.recovery_rate,
            steps: outcome.config.steps,
            patient_zero: outcome.patient_zero,
            edges: outcome.graph.edge_count(),
            degrees: outcome.graph.degree_summary(),
            attack_rate: outcome.history.attack_rate(),
            stats: &outcome.stats,
            history: outcome.history.entries(),
        }
    }
}

/// Write the run report as pretty JSON
pub fn write_json<W: Write>(outcome: &SimulationOutcome, writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(writer, &RunReport::new(outcome))?;
    Ok(())
}

/// Write the run report as pretty JSON to a file
pub fn save_json(outcome: &SimulationOutcome, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(outcome, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// A node in a [`NetworkSample`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleNode {
    pub id: NodeId,
    pub status: HealthStatus,
    /// Degree in the full network, not just the sample
    pub degree: usize,
}

/// Subgraph induced by the first `K` nodes, with terminal statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSample {
    pub nodes: Vec<SampleNode>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl NetworkSample {
    pub fn new(outcome: &SimulationOutcome, size: usize) -> Self {
        let size = size.min(outcome.graph.node_count());
        let nodes = NodeId::range(size)
            .map(|id| SampleNode {
                id,
                status: outcome.statuses[id.index()],
                degree: outcome.graph.degree(id),
            })
            .collect();
        let edges = outcome
            .graph
            .edges()
            .filter(|(a, b)| a.index() < size && b.index() < size)
            .collect();
        Self { nodes, edges }
    }
}

/// Write a network sample of the first `size` nodes as JSON to a file
pub fn save_network_sample(
    outcome: &SimulationOutcome,
    size: usize,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &NetworkSample::new(outcome, size))?;
    writer.flush()?;
    Ok(())
}
