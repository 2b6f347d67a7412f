use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::types::{FeedError, ZimFileMetadata};

/// Streaming parser for OPDS catalog feeds.
///
/// Holds the entries of the most recently parsed document, keyed by
/// file id.
#[derive(Debug, Default)]
pub struct OpdsParser {
    entries: HashMap<Uuid, ZimFileMetadata>,
}

/// Collects text and attributes for the entry currently being read.
#[derive(Debug, Default)]
struct EntryBuilder {
    id: String,
    group_identifier: String,
    title: String,
    description: String,
    language_codes: String,
    category_element: String,
    tags: String,
    issued: String,
    article_count: String,
    media_count: String,
    creator: String,
    publisher: String,
    flavor: Option<String>,
    download_url: Option<String>,
    favicon_url: Option<String>,
    size: u64,
}

impl EntryBuilder {
    fn finish(self) -> Option<(Uuid, ZimFileMetadata)> {
        let raw_id = self.id.trim();
        let raw_id = raw_id.strip_prefix("urn:uuid:").unwrap_or(raw_id);
        let file_id = match Uuid::parse_str(raw_id) {
            Ok(id) => id,
            Err(_) => {
                debug!(id = %self.id, "Skipping entry without a valid uuid id");
                return None;
            }
        };

        let mut category = None;
        let mut has_details = false;
        let mut has_pictures = false;
        let mut has_videos = false;
        let mut requires_service_workers = false;
        for tag in self.tags.split(';') {
            let tag = tag.trim();
            if let Some(value) = tag.strip_prefix("_category:") {
                category = Some(value.to_lowercase());
            } else if let Some(value) = tag.strip_prefix("_details:") {
                has_details = value == "yes";
            } else if let Some(value) = tag.strip_prefix("_pictures:") {
                has_pictures = value == "yes";
            } else if let Some(value) = tag.strip_prefix("_videos:") {
                has_videos = value == "yes";
            } else if let Some(value) = tag.strip_prefix("_sw:") {
                requires_service_workers = value == "yes";
            }
        }
        let category = category.unwrap_or_else(|| {
            let element = self.category_element.trim().to_lowercase();
            if element.is_empty() {
                "other".to_string()
            } else {
                element
            }
        });

        let created = chrono::DateTime::parse_from_rfc3339(self.issued.trim())
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc));

        Some((
            file_id,
            ZimFileMetadata {
                file_id,
                group_identifier: self.group_identifier.trim().to_string(),
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                language_codes: self.language_codes.trim().to_string(),
                category,
                created,
                size: self.size,
                article_count: self.article_count.trim().parse().unwrap_or(0),
                media_count: self.media_count.trim().parse().unwrap_or(0),
                creator: self.creator.trim().to_string(),
                publisher: self.publisher.trim().to_string(),
                download_url: self.download_url,
                favicon_url: self.favicon_url,
                flavor: self.flavor,
                has_details,
                has_pictures,
                has_videos,
                requires_service_workers,
            },
        ))
    }
}

impl OpdsParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a feed document, replacing any entries from a previous
    /// call. Within one document an entry id seen twice is last-wins.
    ///
    /// `url_host` is the catalog origin used to resolve relative
    /// illustration hrefs.
    pub fn parse(&mut self, data: &[u8], url_host: &str) -> Result<(), FeedError> {
        self.entries.clear();

        // UTF-16/32 documents either start with a BOM or interleave NUL
        // bytes, which `from_utf8` would accept; plain text never
        // contains NUL
        if data.starts_with(&[0xFE, 0xFF]) || data.starts_with(&[0xFF, 0xFE]) || data.contains(&0)
        {
            return Err(FeedError::Decode(
                "input is not UTF-8 encoded text".to_string(),
            ));
        }
        let text = std::str::from_utf8(data).map_err(|e| FeedError::Decode(e.to_string()))?;

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut element_stack: Vec<String> = Vec::new();
        let mut current: Option<EntryBuilder> = None;
        let mut saw_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    saw_root = true;
                    let name = local_name(&start);
                    if name == "entry" && current.is_none() {
                        current = Some(EntryBuilder::default());
                    } else if name == "link" {
                        if let Some(entry) = current.as_mut() {
                            read_link(&start, entry, url_host)?;
                        }
                    }
                    element_stack.push(name);
                }
                Ok(Event::Empty(start)) => {
                    saw_root = true;
                    if local_name(&start) == "link" {
                        if let Some(entry) = current.as_mut() {
                            read_link(&start, entry, url_host)?;
                        }
                    }
                }
                Ok(Event::Text(text)) => {
                    if let Some(entry) = current.as_mut() {
                        let value = text
                            .unescape()
                            .map_err(|e| FeedError::Parse(e.to_string()))?;
                        record_text(entry, &element_stack, &value);
                    }
                }
                Ok(Event::End(end)) => {
                    element_stack.pop();
                    if local_name_end(end.local_name().as_ref()) == "entry" {
                        // last-wins on duplicate ids
                        if let Some((id, metadata)) =
                            current.take().and_then(EntryBuilder::finish)
                        {
                            self.entries.insert(id, metadata);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(FeedError::Parse(e.to_string())),
            }
        }

        if !saw_root {
            return Err(FeedError::Parse("no XML elements found".to_string()));
        }

        debug!(entries = self.entries.len(), "Parsed OPDS feed");
        Ok(())
    }

    pub fn zim_file_ids(&self) -> HashSet<Uuid> {
        self.entries.keys().copied().collect()
    }

    pub fn get_metadata(&self, id: &Uuid) -> Option<&ZimFileMetadata> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ZimFileMetadata> {
        self.entries.values()
    }
}

fn local_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn local_name_end(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn record_text(entry: &mut EntryBuilder, stack: &[String], value: &str) {
    let element = match stack.last() {
        Some(element) => element.as_str(),
        None => return,
    };
    let parent = if stack.len() >= 2 {
        stack[stack.len() - 2].as_str()
    } else {
        ""
    };

    match (parent, element) {
        ("entry", "id") => entry.id.push_str(value),
        ("entry", "title") => entry.title.push_str(value),
        ("entry", "summary") | ("entry", "description") => entry.description.push_str(value),
        ("entry", "language") => entry.language_codes.push_str(value),
        ("entry", "name") => entry.group_identifier.push_str(value),
        ("entry", "flavour") => {
            let mut flavor = entry.flavor.take().unwrap_or_default();
            flavor.push_str(value);
            entry.flavor = Some(flavor);
        }
        ("entry", "category") => entry.category_element.push_str(value),
        ("entry", "tags") => entry.tags.push_str(value),
        ("entry", "issued") => entry.issued.push_str(value),
        ("entry", "articleCount") => entry.article_count.push_str(value),
        ("entry", "mediaCount") => entry.media_count.push_str(value),
        ("author", "name") => entry.creator.push_str(value),
        ("publisher", "name") => entry.publisher.push_str(value),
        _ => {}
    }
}

fn read_link(
    start: &BytesStart,
    entry: &mut EntryBuilder,
    url_host: &str,
) -> Result<(), FeedError> {
    let mut rel = String::new();
    let mut href = String::new();
    let mut length = String::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| FeedError::Parse(e.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| FeedError::Parse(e.to_string()))?;
        match attribute.key.as_ref() {
            b"rel" => rel = value.into_owned(),
            b"href" => href = value.into_owned(),
            b"length" => length = value.into_owned(),
            _ => {}
        }
    }

    if rel.ends_with("/image/thumbnail") {
        entry.favicon_url = resolve_href(&href, url_host);
    } else if rel.ends_with("/acquisition/open-access") {
        entry.download_url = resolve_href(&href, url_host);
        entry.size = length.parse().unwrap_or(0);
    }
    Ok(())
}

fn resolve_href(href: &str, url_host: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Url::parse(url_host)
            .and_then(|base| base.join(href))
            .map(|url| url.to_string())
            .ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    const HOST: &str = "https://opds.library.kiwix.org";

    #[test]
    fn test_parse_full_entry() {
        let id = Uuid::parse_str("1ec90eab-5724-492b-9529-893959520de4").unwrap();
        let feed = fixtures::opds_feed(&[fixtures::best_of_wikipedia(id)]);
        let mut parser = OpdsParser::new();
        parser.parse(feed.as_bytes(), HOST).unwrap();

        assert_eq!(parser.len(), 1);
        let metadata = parser.get_metadata(&id).unwrap();
        assert_eq!(metadata.file_id, id);
        assert_eq!(metadata.title, "Best of Wikipedia");
        assert_eq!(
            metadata.description,
            "A selection of the best 50,000 Wikipedia articles"
        );
        assert_eq!(metadata.group_identifier, "wikipedia_en_top");
        assert_eq!(metadata.language_codes, "eng");
        assert_eq!(metadata.category, "wikipedia");
        assert_eq!(metadata.flavor.as_deref(), Some("maxi"));
        assert_eq!(metadata.article_count, 50001);
        assert_eq!(metadata.media_count, 566835);
        assert_eq!(metadata.size, 6515656704);
        assert_eq!(metadata.creator, "Wikipedia");
        assert_eq!(metadata.publisher, "Kiwix");
        assert!(metadata.has_details);
        assert!(metadata.has_pictures);
        assert!(!metadata.has_videos);
        assert!(!metadata.requires_service_workers);
        assert_eq!(
            metadata.download_url.as_deref(),
            Some("https://download.kiwix.org/zim/wikipedia/wikipedia_en_top_maxi_2023-10.zim.meta4")
        );
        let expected_favicon = format!("{HOST}/catalog/v2/illustration/{id}/");
        assert_eq!(metadata.favicon_url.as_deref(), Some(expected_favicon.as_str()));
        assert!(metadata.created.is_some());
    }

    #[test]
    fn test_parse_rejects_non_xml() {
        let mut parser = OpdsParser::new();
        let result = parser.parse(b"Invalid OPDS Data", HOST);
        assert!(matches!(result, Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_non_utf8() {
        let data: Vec<u8> = "<feed></feed>"
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        let mut parser = OpdsParser::new();
        let result = parser.parse(&data, HOST);
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_parse_rejects_byte_order_mark() {
        // a UTF-16 BOM followed by bytes that happen to be valid UTF-8
        let mut data = vec![0xFF, 0xFE];
        data.extend_from_slice(b"<feed></feed>");
        let mut parser = OpdsParser::new();
        let result = parser.parse(&data, HOST);
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_reparse_replaces_previous_entries() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut parser = OpdsParser::new();
        parser
            .parse(
                fixtures::opds_feed(&[fixtures::best_of_wikipedia(first)]).as_bytes(),
                HOST,
            )
            .unwrap();
        parser
            .parse(
                fixtures::opds_feed(&[fixtures::best_of_wikipedia(second)]).as_bytes(),
                HOST,
            )
            .unwrap();

        assert_eq!(parser.len(), 1);
        assert!(parser.get_metadata(&first).is_none());
        assert!(parser.get_metadata(&second).is_some());
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let mut parser = OpdsParser::new();
        let result = parser.parse(b"<feed><entry></feed>", HOST);
        assert!(matches!(result, Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_entry_without_uuid_is_skipped() {
        let feed = fixtures::opds_feed(&[
            "<entry><id>not-a-uuid</id><title>Broken</title></entry>".to_string(),
        ]);
        let mut parser = OpdsParser::new();
        parser.parse(feed.as_bytes(), HOST).unwrap();
        assert!(parser.is_empty());
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let id = Uuid::parse_str("1ec90eab-5724-492b-9529-893959520de4").unwrap();
        let first = fixtures::best_of_wikipedia(id);
        let second = first.replace("Best of Wikipedia", "Second Title");
        let feed = fixtures::opds_feed(&[first, second]);

        let mut parser = OpdsParser::new();
        parser.parse(feed.as_bytes(), HOST).unwrap();
        assert_eq!(parser.len(), 1);
        assert_eq!(parser.get_metadata(&id).unwrap().title, "Second Title");
    }

    #[test]
    fn test_category_falls_back_to_element_then_other() {
        let id_a = Uuid::new_v4();
        let id_b = Uuid::new_v4();
        let feed = fixtures::opds_feed(&[
            format!(
                "<entry><id>urn:uuid:{id_a}</id><title>A</title>\
                 <category>Wiktionary</category></entry>"
            ),
            format!("<entry><id>urn:uuid:{id_b}</id><title>B</title></entry>"),
        ]);
        let mut parser = OpdsParser::new();
        parser.parse(feed.as_bytes(), HOST).unwrap();
        assert_eq!(parser.get_metadata(&id_a).unwrap().category, "wiktionary");
        assert_eq!(parser.get_metadata(&id_b).unwrap().category, "other");
    }

    #[test]
    fn test_absolute_favicon_kept_as_is() {
        let id = Uuid::new_v4();
        let feed = fixtures::opds_feed(&[format!(
            "<entry><id>urn:uuid:{id}</id><title>A</title>\
             <link rel=\"http://opds-spec.org/image/thumbnail\" \
             href=\"https://static.example.org/icon.png\" type=\"image/png\"/></entry>"
        )]);
        let mut parser = OpdsParser::new();
        parser.parse(feed.as_bytes(), HOST).unwrap();
        assert_eq!(
            parser.get_metadata(&id).unwrap().favicon_url.as_deref(),
            Some("https://static.example.org/icon.png")
        );
    }
}
