use crate::config::LayoutConfig;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::FONT_RESOURCE;
use tracing::trace;

/// Numbered objects of one document, in emission order.
///
/// Identifiers are handed out sequentially from 1: the catalog, the page
/// tree, the shared font, then a content stream followed by its page object
/// for every page. The page tree is emitted as a placeholder and backfilled
/// with its `/Kids` and `/Count` once all pages exist.
pub struct ObjectGraph {
    objects: Vec<(ObjectId, Object)>,
    next_number: u32,
    catalog_id: ObjectId,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    media_box: Object,
}

impl ObjectGraph {
    pub fn new(config: &LayoutConfig) -> Self {
        let mut graph = Self {
            objects: Vec::new(),
            next_number: 1,
            catalog_id: ObjectId::new(0, 0),
            pages_id: ObjectId::new(0, 0),
            font_id: ObjectId::new(0, 0),
            page_ids: Vec::new(),
            media_box: Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(config.page_width),
                Object::Real(config.page_height),
            ]),
        };

        graph.catalog_id = graph.allocate();
        graph.pages_id = graph.allocate();

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::name("Catalog"));
        catalog.set("Pages", graph.pages_id);
        graph.objects.push((graph.catalog_id, Object::Dictionary(catalog)));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::name("Pages"));
        graph.objects.push((graph.pages_id, Object::Dictionary(pages)));

        let mut font = Dictionary::new();
        font.set("Type", Object::name("Font"));
        font.set("Subtype", Object::name("Type1"));
        font.set("BaseFont", Object::name("Helvetica"));
        graph.font_id = graph.push(Object::Dictionary(font));

        graph
    }

    fn allocate(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_number, 0);
        self.next_number += 1;
        id
    }

    fn push(&mut self, object: Object) -> ObjectId {
        let id = self.allocate();
        self.objects.push((id, object));
        id
    }

    /// Adds a content stream and the page object that draws it. Returns the
    /// page object's id.
    pub fn add_page(&mut self, content: String) -> ObjectId {
        let mut stream_dict = Dictionary::new();
        stream_dict.set("Length", content.len());
        let content_id = self.push(Object::Stream(stream_dict, content));

        let mut font_resources = Dictionary::new();
        font_resources.set(FONT_RESOURCE, self.font_id);
        let mut resources = Dictionary::new();
        resources.set("Font", font_resources);

        let mut page = Dictionary::new();
        page.set("Type", Object::name("Page"));
        page.set("Parent", self.pages_id);
        page.set("MediaBox", self.media_box.clone());
        page.set("Contents", content_id);
        page.set("Resources", resources);
        let page_id = self.push(Object::Dictionary(page));

        trace!(page = page_id.number(), content = content_id.number(), "added page objects");
        self.page_ids.push(page_id);
        page_id
    }

    pub fn catalog_id(&self) -> ObjectId {
        self.catalog_id
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Highest identifier handed out so far.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Backfills the page tree and hands over the objects in emission order.
    pub fn finish(mut self) -> Vec<(ObjectId, Object)> {
        let kids: Vec<Object> = self.page_ids.iter().copied().map(Object::Reference).collect();
        let count = self.page_ids.len();
        let pages_id = self.pages_id;

        if let Some((_, Object::Dictionary(pages))) =
            self.objects.iter_mut().find(|(id, _)| *id == pages_id)
        {
            pages.set("Kids", Object::Array(kids));
            pages.set("Count", count);
        }

        self.objects
    }
}
