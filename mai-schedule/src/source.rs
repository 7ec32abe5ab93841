use mai_http::{HttpClient, HttpError};
use scraper::Html;
use url::Url;

/// Anything that can turn a URL into a parsed HTML document.
///
/// The production implementation is [`HttpClient`]; tests plug in stubs that
/// serve fixed pages and record the URLs they were asked for.
pub trait DocumentSource {
    fn fetch_document(&self, url: &Url) -> Result<Html, HttpError>;
}

impl DocumentSource for HttpClient {
    fn fetch_document(&self, url: &Url) -> Result<Html, HttpError> {
        let body = self.get_text(url)?;
        Ok(Html::parse_document(&body))
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn fetch_document(&self, url: &Url) -> Result<Html, HttpError> {
        (**self).fetch_document(url)
    }
}
