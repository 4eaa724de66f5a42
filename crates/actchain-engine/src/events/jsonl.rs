use super::types::ChainEventRecord;

pub fn encode_event_jsonl_line(record: &ChainEventRecord) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    Ok(line)
}

pub fn parse_event_jsonl_line(line: &str) -> serde_json::Result<ChainEventRecord> {
    serde_json::from_str::<ChainEventRecord>(line.trim_end())
}

#[cfg(test)]
#[path = "jsonl_test.rs"]
mod tests;
