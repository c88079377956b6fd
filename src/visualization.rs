//! Plain-text renderings of states, counts and circuits

use std::fmt::Write;

use crate::quantum::circuit::{Operation, QuantumCircuit};
use crate::quantum::state::{QuantumState, StateVector};
use crate::simulators::Counts;

const BAR: char = '█';

/// Every amplitude with its ket label, polar form and probability
pub fn render_statevector(state: &StateVector) -> String {
    let n = state.qubit_count();
    let mut out = String::new();
    for (i, amp) in state.amplitudes().iter().enumerate() {
        let _ = writeln!(
            out,
            "|{:0width$b}⟩  {:+.6}{:+.6}i  |a|={:.6}  arg={:+.4}  p={:.4}",
            i,
            amp.re,
            amp.im,
            amp.norm(),
            amp.arg(),
            amp.norm_sqr(),
            width = n
        );
    }
    out
}

fn bar(value: f64, max: f64, width: usize) -> String {
    let len = if max > 0.0 {
        ((value / max) * width as f64).round() as usize
    } else {
        0
    };
    std::iter::repeat(BAR).take(len).collect()
}

/// Horizontal bar chart of basis-state probabilities
pub fn render_probabilities(state: &StateVector, width: usize) -> String {
    let n = state.qubit_count();
    let probabilities = state.probabilities();
    let max = probabilities.iter().copied().fold(0.0, f64::max);
    let mut out = String::new();
    for (i, p) in probabilities.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:0n$b} | {:<width$} {:.4}",
            i,
            bar(*p, max, width),
            p,
            n = n,
            width = width
        );
    }
    out
}

/// Horizontal bar chart of measurement counts
pub fn render_histogram(counts: &Counts, width: usize) -> String {
    let total = counts.total().max(1) as f64;
    let max = counts.iter().map(|(_, c)| c).max().unwrap_or(0) as f64;
    let label_width = counts.labels().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, count) in counts.iter() {
        let _ = writeln!(
            out,
            "{:>lw$} | {:<width$} {} ({:.1}%)",
            label,
            bar(count as f64, max, width),
            count,
            100.0 * count as f64 / total,
            lw = label_width,
            width = width
        );
    }
    out
}

/// Name prefixes of the parametrized gates controlled on their first qubit
const CONTROLLED_PREFIXES: [&str; 4] = ["CRx(", "CRy(", "CRz(", "CP("];

/// Per-wire symbols for a gate with the given name and arity.
///
/// Only the crate's own controlled gates (and their adjoints) get a control
/// dot; any other multi-qubit gate is labelled on every wire.
fn gate_symbols(name: &str, arity: usize) -> Vec<String> {
    let control = "●".to_string();
    let (base, dagger) = match name.strip_suffix('†') {
        Some(base) => (base, "†"),
        None => (name, ""),
    };
    match (base, arity) {
        (_, 1) => vec![name.to_string()],
        ("CNOT", 2) => vec![control, format!("X{}", dagger)],
        ("CZ", 2) => vec![control, format!("Z{}", dagger)],
        ("CY", 2) => vec![control, format!("Y{}", dagger)],
        ("SWAP", 2) => vec!["x".to_string(), "x".to_string()],
        ("Toffoli", 3) => vec![control.clone(), control, format!("X{}", dagger)],
        (base, 2) if CONTROLLED_PREFIXES.iter().any(|p| base.starts_with(p)) => {
            vec![control, format!("{}{}", &base[1..], dagger)]
        }
        (_, arity) => (0..arity).map(|i| format!("{}[{}]", name, i)).collect(),
    }
}

/// ASCII wire diagram, one row per qubit, one column per operation
pub fn render_circuit(circuit: &QuantumCircuit) -> String {
    let n = circuit.qubit_count();
    let prefix_width = format!("q{}", n.saturating_sub(1)).len();
    let mut rows: Vec<String> = (0..n)
        .map(|q| format!("{:>w$}: ", format!("q{}", q), w = prefix_width))
        .collect();

    for op in circuit.operations() {
        let mut cells: Vec<Option<String>> = vec![None; n];
        match op {
            Operation::Gate { gate, qubits } => {
                for (&q, symbol) in qubits.iter().zip(gate_symbols(&gate.name(), qubits.len())) {
                    cells[q] = Some(symbol);
                }
            }
            Operation::Measure { qubit, clbit } => cells[*qubit] = Some(format!("M{}", clbit)),
            Operation::Reset { qubit } => cells[*qubit] = Some("|0⟩".to_string()),
            Operation::Barrier => cells.iter_mut().for_each(|c| *c = Some("░".to_string())),
        }

        let width = cells
            .iter()
            .flatten()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(1)
            + 2;
        for (row, cell) in rows.iter_mut().zip(cells) {
            let symbol = cell.unwrap_or_default();
            let _ = write!(row, "{:─^width$}", symbol, width = width);
        }
    }

    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{}─", row);
    }
    out
}
