use std::collections::HashSet;

use serde::Serialize;

use crate::config::COPYRIGHT_HOLDER;
use crate::error::{ChefError, Result};
use crate::practice::Question;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub kind: &'static str,
    pub copyright_holder: String,
}

impl License {
    pub fn cc_by_nc_sa() -> Self {
        Self {
            kind: "CC BY-NC-SA",
            copyright_holder: COPYRIGHT_HOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YouTubeVideo {
    pub youtube_id: String,
    pub high_resolution: bool,
    pub language: String,
}

/// Completion policy of an exercise: every question answered correctly, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mastery {
    pub mastery_model: &'static str,
    pub randomize: bool,
}

impl Default for Mastery {
    fn default() -> Self {
        Self {
            mastery_model: "do_all",
            randomize: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicNode {
    pub source_id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoNode {
    pub source_id: String,
    pub title: String,
    pub license: License,
    pub language: String,
    pub video: YouTubeVideo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseNode {
    pub source_id: String,
    pub title: String,
    pub license: License,
    pub language: String,
    pub mastery: Mastery,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Topic(TopicNode),
    Video(VideoNode),
    Exercise(ExerciseNode),
}

impl Node {
    pub fn source_id(&self) -> &str {
        match self {
            Node::Topic(t) => &t.source_id,
            Node::Video(v) => &v.source_id,
            Node::Exercise(e) => &e.source_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Node::Topic(t) => &t.title,
            Node::Video(v) => &v.title,
            Node::Exercise(e) => &e.title,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Topic(_) => "topic",
            Node::Video(_) => "video",
            Node::Exercise(_) => "exercise",
        }
    }
}

impl TopicNode {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>, thumbnail: Option<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            thumbnail,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, node: Node) {
        self.children.push(node);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub source_domain: String,
    pub source_id: String,
    pub title: String,
    pub language: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeCounts {
    pub topics: usize,
    pub videos: usize,
    pub exercises: usize,
    pub questions: usize,
}

impl Channel {
    pub fn add_child(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn counts(&self) -> TreeCounts {
        let mut counts = TreeCounts::default();
        count_nodes(&self.children, &mut counts);
        counts
    }

    /// Structural checks run before the tree is handed off. Any failure
    /// rejects the whole run.
    pub fn validate(&self) -> Result<()> {
        if self.children.is_empty() {
            return Err(ChefError::InvalidChannel("channel has no content".into()));
        }
        validate_siblings(&self.source_id, &self.children)
    }
}

fn count_nodes(nodes: &[Node], counts: &mut TreeCounts) {
    for node in nodes {
        match node {
            Node::Topic(t) => {
                counts.topics += 1;
                count_nodes(&t.children, counts);
            }
            Node::Video(_) => counts.videos += 1,
            Node::Exercise(e) => {
                counts.exercises += 1;
                counts.questions += e.questions.len();
            }
        }
    }
}

fn validate_siblings(parent: &str, nodes: &[Node]) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.source_id()) {
            return Err(ChefError::InvalidChannel(format!(
                "duplicate source id `{}` under `{}`",
                node.source_id(),
                parent
            )));
        }
        match node {
            Node::Topic(t) => validate_siblings(&t.source_id, &t.children)?,
            Node::Video(v) => {
                if v.video.youtube_id.is_empty() {
                    return Err(ChefError::InvalidChannel(format!(
                        "video `{}` has no youtube id",
                        v.source_id
                    )));
                }
            }
            Node::Exercise(e) => validate_exercise(e)?,
        }
    }
    Ok(())
}

fn validate_exercise(e: &ExerciseNode) -> Result<()> {
    let invalid = |msg: String| -> Result<()> {
        Err(ChefError::InvalidChannel(format!("exercise `{}`: {}", e.source_id, msg)))
    };

    if e.questions.is_empty() {
        return invalid("no questions".into());
    }
    let mut ids = HashSet::new();
    for question in &e.questions {
        let q = question.inner();
        if !ids.insert(q.id.as_str()) {
            return invalid(format!("duplicate question id `{}`", q.id));
        }
        if let Some(stray) = q.correct_answers.iter().find(|c| !q.all_answers.contains(c)) {
            return invalid(format!("question `{}` marks `{}` correct but does not offer it", q.id, stray));
        }
        if matches!(question, Question::SingleSelect(_)) && q.correct_answers.len() != 1 {
            return invalid(format!(
                "single-select question `{}` has {} correct answers",
                q.id,
                q.correct_answers.len()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::NormalizedQuestion;

    fn channel(children: Vec<Node>) -> Channel {
        Channel {
            source_domain: "test".into(),
            source_id: "chan".into(),
            title: "Chan".into(),
            language: "es".into(),
            description: String::new(),
            thumbnail: None,
            children,
        }
    }

    fn question(id: &str, correct: &[&str]) -> Question {
        Question::SingleSelect(NormalizedQuestion {
            id: id.into(),
            prompt: "?".into(),
            all_answers: vec!["a".into(), "b".into()],
            correct_answers: correct.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn exercise(id: &str, questions: Vec<Question>) -> Node {
        Node::Exercise(ExerciseNode {
            source_id: id.into(),
            title: id.into(),
            license: License::cc_by_nc_sa(),
            language: "es".into(),
            mastery: Mastery::default(),
            questions,
        })
    }

    fn video(id: &str, youtube_id: &str) -> Node {
        Node::Video(VideoNode {
            source_id: id.into(),
            title: id.into(),
            license: License::cc_by_nc_sa(),
            language: "es".into(),
            video: YouTubeVideo {
                youtube_id: youtube_id.into(),
                high_resolution: true,
                language: "es".into(),
            },
        })
    }

    #[test]
    fn empty_channel_rejected() {
        assert!(matches!(channel(vec![]).validate(), Err(ChefError::InvalidChannel(_))));
    }

    #[test]
    fn duplicate_siblings_rejected_but_cousins_allowed() {
        let mut a = TopicNode::new("a", "A", None);
        a.add_child(video("v", "yt"));
        let mut b = TopicNode::new("b", "B", None);
        b.add_child(video("v", "yt"));
        assert!(channel(vec![Node::Topic(a.clone()), Node::Topic(b)]).validate().is_ok());

        a.add_child(video("v", "yt2"));
        assert!(channel(vec![Node::Topic(a)]).validate().is_err());
    }

    #[test]
    fn exercise_checks() {
        assert!(channel(vec![exercise("e", vec![])]).validate().is_err());
        assert!(channel(vec![exercise("e", vec![question("q", &["a"]), question("q", &["b"])])])
            .validate()
            .is_err());
        assert!(channel(vec![exercise("e", vec![question("q", &["z"])])]).validate().is_err());
        assert!(channel(vec![exercise("e", vec![question("q", &["a", "b"])])]).validate().is_err());
        assert!(channel(vec![exercise("e", vec![question("q", &["a"])])]).validate().is_ok());
    }

    #[test]
    fn video_needs_id() {
        assert!(channel(vec![video("v", "")]).validate().is_err());
    }

    #[test]
    fn counts_walk_the_tree() {
        let mut t = TopicNode::new("t", "T", None);
        t.add_child(video("v", "yt"));
        t.add_child(exercise("e", vec![question("q1", &["a"]), question("q2", &["b"])]));
        let counts = channel(vec![Node::Topic(t)]).counts();
        assert_eq!(
            counts,
            TreeCounts {
                topics: 1,
                videos: 1,
                exercises: 1,
                questions: 2
            }
        );
    }
}
