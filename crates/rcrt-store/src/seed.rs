//! Example entries written into a fresh store by `init`.

use rcrt_types::{Entry, EntryId};

use crate::error::StoreResult;
use crate::store::EntryStore;

const WELCOME_POST: &str = "Hello! This timeline was just created.";
const LINK_URL: &str = "https://www.rust-lang.org/";
const ARTICLE_TITLE: &str = "Welcome to your timeline";
const ARTICLE_SERIES: &str = "Getting started";
const PLACEHOLDER_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"64\" height=\"64\">\
<rect width=\"64\" height=\"64\" fill=\"#ccc\"/></svg>\n";

/// Ids of the entries created by [`EntryStore::seed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seeded {
    pub post: EntryId,
    pub link: EntryId,
    pub article: EntryId,
    pub image: EntryId,
}

impl Seeded {
    pub fn ids(&self) -> [&EntryId; 4] {
        [&self.post, &self.link, &self.article, &self.image]
    }
}

fn article_body(link: &EntryId) -> String {
    format!(
        "Entries live in meta.json next to their content files.\n\n\
         Articles like this one keep their text in a separate file and can point at \
         other entries, for example [the Rust homepage]#{link}.\n\n\
         Shift-click a title in editable mode to change it.\n"
    )
}

impl EntryStore {
    /// Populate the store with one entry of each kind.
    ///
    /// The article body references the link entry, and the image entry gets a
    /// small SVG placeholder so every content-file entry has its file.
    pub fn seed(&self) -> StoreResult<Seeded> {
        let _guard = self.lock()?;
        let now = chrono::Utc::now().timestamp();

        let post = self.insert_new(
            Entry::Post {
                text: WELCOME_POST.into(),
                time: Some(now),
            },
            None,
        )?;
        let link = self.insert_new(Entry::Link { url: LINK_URL.into() }, None)?;
        let article = self.insert_new(
            Entry::Article {
                title: ARTICLE_TITLE.into(),
                time: Some(now),
                series: Some(ARTICLE_SERIES.into()),
            },
            Some(article_body(&link).as_bytes()),
        )?;
        let image = self.insert_new(
            Entry::Image { ext: "svg".into() },
            Some(PLACEHOLDER_SVG.as_bytes()),
        )?;

        tracing::info!(path = %self.root().display(), "seeded store");
        Ok(Seeded {
            post,
            link,
            article,
            image,
        })
    }

    /// Create a store at `path` and seed it.
    pub fn init(path: impl AsRef<std::path::Path>) -> StoreResult<(Self, Seeded)> {
        let store = Self::create(path)?;
        let seeded = store.seed()?;
        Ok((store, seeded))
    }

    /// Open the store at `path`, initializing it first if nothing is there.
    pub fn open_or_init(path: impl AsRef<std::path::Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Ok(Self::init(path)?.0)
        }
    }
}
