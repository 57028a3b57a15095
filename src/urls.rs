use url::Url;

use crate::student::Id;

/// Builds the absolute URLs returned in `location` headers.
#[derive(Clone, Debug)]
pub struct Urls {
    /// The collection URL, ending in a slash so that IDs join beneath it.
    collection: Url,

    /// Path segment under which the roster is served.
    pub(crate) students_path: String,
}

impl Urls {
    /// `base` should end in a slash; `students_path` should not.
    pub fn new(base: impl AsRef<str>, students_path: impl Into<String>) -> Self {
        let students_path = students_path.into();
        let collection = Url::parse(base.as_ref())
            .and_then(|base| base.join(&format!("{}/", students_path)))
            .unwrap_or_else(|e| panic!("build students URL from {} ({})", base.as_ref(), e));

        Urls {
            collection,
            students_path,
        }
    }

    pub fn student(&self, id: Id) -> Url {
        let mut url = self.collection.clone();
        url.set_path(&format!("{}{}", self.collection.path(), id));
        url
    }
}
