use std::collections::HashMap;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::config::{CHANNEL_DESCRIPTION, CHANNEL_DOMAIN, CHANNEL_NAME, CHANNEL_SOURCE_ID};
use crate::error::{ChefError, Result};
use crate::fetch::{PageKind, PageSource};
use crate::parser::dom::Page;
use crate::parser::{catalog, course, lesson, module};
use crate::practice::questions_from_payload;
use crate::tree::{Channel, ExerciseNode, License, Mastery, Node, TopicNode, VideoNode, YouTubeVideo};
use crate::utils::source_id;

/// Walks the site (catalog → courses → modules → lessons) and assembles the
/// channel tree. Any missing page element aborts the walk.
pub struct GarageChef<'a> {
    source: &'a dyn PageSource,
    base_url: String,
    language: String,
}

impl<'a> GarageChef<'a> {
    pub fn new(source: &'a dyn PageSource, base_url: &str, language: &str) -> Self {
        Self {
            source,
            base_url: base_url.to_string(),
            language: language.to_string(),
        }
    }

    /// Build and validate the whole channel.
    pub fn construct_channel(&self) -> Result<Channel> {
        let mut channel = Channel {
            source_domain: CHANNEL_DOMAIN.to_string(),
            source_id: CHANNEL_SOURCE_ID.to_string(),
            title: CHANNEL_NAME.to_string(),
            language: self.language.clone(),
            description: CHANNEL_DESCRIPTION.to_string(),
            thumbnail: None,
            children: Vec::new(),
        };

        info!("Starting to scrape the channel...");
        let catalog_url = format!("{}courses", self.base_url);
        let page = self.page(PageKind::Catalog, &catalog_url)?;
        self.parse_catalog(&mut channel, &page)?;

        channel.validate()?;
        let counts = channel.counts();
        info!(
            "Built channel: {} topics, {} videos, {} exercises, {} questions",
            counts.topics, counts.videos, counts.exercises, counts.questions
        );
        Ok(channel)
    }

    fn page(&self, kind: PageKind, url: &str) -> Result<Page> {
        let html = self.source.fetch(kind, url)?;
        Ok(Page::parse(&html, kind.label()))
    }

    fn parse_catalog(&self, channel: &mut Channel, page: &Page) -> Result<()> {
        // Category key → position in `topics`. Filled once, then only read.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut topics: Vec<TopicNode> = Vec::new();
        for category in catalog::categories(page)? {
            index.insert(category.key.clone(), topics.len());
            topics.push(TopicNode::new(category.title.clone(), category.title, None));
        }

        let courses = catalog::courses(page)?;
        info!("Catalog lists {} categories and {} courses", topics.len(), courses.len());

        let pb = ProgressBar::new(courses.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        for entry in courses {
            let slot = *index
                .get(&entry.category)
                .ok_or_else(|| ChefError::UnknownCategory {
                    course: entry.title.clone(),
                    category: entry.category.clone(),
                })?;
            pb.set_message(entry.title.clone());

            let mut course_node = TopicNode::new(entry.title.clone(), entry.title.clone(), entry.image.clone());
            let url = catalog::course_url(&self.base_url, &entry.slug);
            self.parse_course(&mut course_node, &url)?;
            topics[slot].add_child(Node::Topic(course_node));
            pb.inc(1);
        }
        pb.finish_and_clear();

        for topic in topics {
            channel.add_child(Node::Topic(topic));
        }
        Ok(())
    }

    fn parse_course(&self, course: &mut TopicNode, url: &str) -> Result<()> {
        info!("Parsing course {}...", course.title);
        let page = self.page(PageKind::Course, url)?;
        for card in course::module_cards(&page, &self.base_url)? {
            let mut module_node = TopicNode::new(
                source_id(&self.language, &card.url),
                card.title,
                Some(card.thumbnail),
            );
            self.parse_module(&mut module_node, &card.url)?;
            course.add_child(Node::Topic(module_node));
        }
        Ok(())
    }

    fn parse_module(&self, module: &mut TopicNode, url: &str) -> Result<()> {
        info!("Parsing module {}...", module.title);
        let page = self.page(PageKind::Module, url)?;
        for entry in module::lessons(&page, &self.base_url)? {
            let mut lesson_node = TopicNode::new(source_id(&self.language, &entry.url), entry.title.clone(), None);
            self.add_lesson_video(&mut lesson_node, &entry.url)?;
            self.add_lesson_practice(&mut lesson_node, &entry.practice_url)?;
            module.add_child(Node::Topic(lesson_node));
        }
        self.add_exam(module, &module::exam_url(url));
        Ok(())
    }

    fn add_lesson_video(&self, lesson: &mut TopicNode, url: &str) -> Result<()> {
        info!("Adding video for the lesson {}...", lesson.title);
        let page = self.page(PageKind::Lesson, url)?;
        let youtube_id = lesson::video_id(&page)?;

        lesson.add_child(Node::Video(VideoNode {
            source_id: format!("{}-video", source_id(&self.language, url)),
            title: format!("{} Video", lesson.title),
            license: License::cc_by_nc_sa(),
            language: self.language.clone(),
            video: YouTubeVideo {
                youtube_id,
                high_resolution: true,
                language: self.language.clone(),
            },
        }));
        Ok(())
    }

    fn add_lesson_practice(&self, lesson: &mut TopicNode, url: &str) -> Result<()> {
        info!("Adding practice for the lesson {}...", lesson.title);
        let html = self.source.fetch(PageKind::Practice, url)?;
        let Some(payload) = lesson::practice(&html)? else {
            debug!("No practice payload at {}", url);
            return Ok(());
        };

        let practice_id = source_id(&self.language, url);
        let questions = questions_from_payload(&payload, &practice_id, url);
        if questions.is_empty() {
            return Ok(());
        }

        lesson.add_child(Node::Exercise(ExerciseNode {
            source_id: practice_id,
            title: format!("{} Practice", lesson.title),
            license: License::cc_by_nc_sa(),
            language: self.language.clone(),
            mastery: Mastery::default(),
            questions,
        }));
        Ok(())
    }

    // Exams are not turned into content; only their location is recorded.
    fn add_exam(&self, module: &TopicNode, url: &str) {
        info!("Skipping exam for the module {} ({})", module.title, url);
    }
}
