//! Chat prompt construction

/// One completed exchange of a chat history
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Build the round-based chat prompt for `query` after `history`
///
/// Rounds are numbered from zero. Each past turn renders as
/// `"[Round i]\n\n问：Q\n\n答：A\n\n"` and the new query is left open after
/// `"答："` for the model to continue.
pub fn build_prompt(query: &str, history: &[Turn]) -> String {
    let mut prompt = String::new();
    for (round, turn) in history.iter().enumerate() {
        prompt.push_str(&format!(
            "[Round {round}]\n\n问：{}\n\n答：{}\n\n",
            turn.question, turn.answer
        ));
    }
    prompt.push_str(&format!(
        "[Round {}]\n\n问：{query}\n\n答：",
        history.len()
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_history() {
        assert_eq!(build_prompt("你好", &[]), "[Round 0]\n\n问：你好\n\n答：");
    }

    #[test]
    fn test_prompt_with_history() {
        let history = vec![
            Turn::new("你好", "你好👋！"),
            Turn::new("晚上睡不着应该怎么办", "放松"),
        ];
        let prompt = build_prompt("还有呢", &history);
        assert_eq!(
            prompt,
            "[Round 0]\n\n问：你好\n\n答：你好👋！\n\n\
             [Round 1]\n\n问：晚上睡不着应该怎么办\n\n答：放松\n\n\
             [Round 2]\n\n问：还有呢\n\n答："
        );
    }

    #[test]
    fn test_empty_query_still_opens_a_round() {
        assert!(build_prompt("", &[]).ends_with("问：\n\n答："));
    }
}
