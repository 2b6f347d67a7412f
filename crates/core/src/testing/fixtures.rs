//! Canned OPDS feed documents modeled on the public Kiwix catalog.

use uuid::Uuid;

/// Wrap entry fragments in a complete Atom/OPDS feed document.
pub fn opds_feed(entries: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <feed xmlns=\"http://www.w3.org/2005/Atom\"\n\
               xmlns:dc=\"http://purl.org/dc/terms/\"\n\
               xmlns:opds=\"https://specs.opds.io/opds-1.2\">\n\
           <id>38095e2e-01a7-4f70-9e0f-c2199f5e0a44</id>\n\
           <title>All Entries</title>\n\
           <updated>2023-11-06T00:00:00Z</updated>\n\
           {}\n\
         </feed>",
        entries.join("\n")
    )
}

/// The "Best of Wikipedia" catalog entry with the given file id.
pub fn best_of_wikipedia(id: Uuid) -> String {
    format!(
        "<entry>\n\
           <id>urn:uuid:{id}</id>\n\
           <title>Best of Wikipedia</title>\n\
           <updated>2023-10-31T00:00:00Z</updated>\n\
           <summary>A selection of the best 50,000 Wikipedia articles</summary>\n\
           <language>eng</language>\n\
           <name>wikipedia_en_top</name>\n\
           <flavour>maxi</flavour>\n\
           <category>wikipedia</category>\n\
           <tags>wikipedia;_category:wikipedia;_pictures:yes;_videos:no;_details:yes;_ftindex:yes</tags>\n\
           <articleCount>50001</articleCount>\n\
           <mediaCount>566835</mediaCount>\n\
           <author><name>Wikipedia</name></author>\n\
           <publisher><name>Kiwix</name></publisher>\n\
           <dc:issued>2023-10-31T00:00:00Z</dc:issued>\n\
           <link rel=\"http://opds-spec.org/image/thumbnail\"\n\
                 href=\"/catalog/v2/illustration/{id}/\"\n\
                 type=\"image/png;width=48;height=48;scale=1\"/>\n\
           <link type=\"text/html\" href=\"/viewer#wikipedia_en_top_maxi/A/index\"/>\n\
           <link rel=\"http://opds-spec.org/acquisition/open-access\"\n\
                 type=\"application/x-zim\"\n\
                 href=\"https://download.kiwix.org/zim/wikipedia/wikipedia_en_top_maxi_2023-10.zim.meta4\"\n\
                 length=\"6515656704\"/>\n\
         </entry>"
    )
}
