use weave::display::{SessionExchange, filter_printable};

/// Align interactive outputs 1:1 with their inputs: short output is padded
/// with empty lines so every input has a corresponding output; extra
/// trailing output is dropped.
pub fn align_outputs(input_count: usize, mut outputs: Vec<String>) -> Vec<String> {
    outputs.resize(input_count, String::new());
    outputs
}

/// Pair inputs with aligned outputs as rendered exchanges. Inputs are
/// trimmed for display; outputs are filtered to printable characters.
pub fn build_exchanges(
    prompt: &str,
    inputs: &[String],
    outputs: Vec<String>,
) -> Vec<SessionExchange> {
    let aligned = align_outputs(inputs.len(), outputs);
    inputs
        .iter()
        .zip(aligned)
        .map(|(input, output)| SessionExchange {
            prompt: prompt.to_string(),
            input: input.trim().to_string(),
            output: filter_printable(&output),
        })
        .collect()
}
