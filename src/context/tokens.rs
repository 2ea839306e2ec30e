use crate::context::Message;
use anyhow::Result;
use tiktoken_rs::CoreBPE;

fn encoding_for_model(model: &str) -> Result<CoreBPE> {
    tiktoken_rs::get_bpe_from_model(model).or_else(|_| tiktoken_rs::cl100k_base())
}

/// Approximate prompt cost for a message list: each content string is
/// tokenized independently with the model's encoding (default encoding
/// when the model is unknown). Role and separator overhead is not counted.
pub fn count_message_tokens(messages: &[Message], model: &str) -> Result<usize> {
    let bpe = encoding_for_model(model)?;
    Ok(messages
        .iter()
        .map(|m| bpe.encode_ordinary(&m.content).len())
        .sum())
}
