//! Where the catalog JSON comes from.

use std::fmt;
use std::path::PathBuf;

use choco_shop_core::Product;
use tracing::{debug, error, instrument};
use url::Url;

use super::CatalogError;

/// Location of the catalog file: a JSON array of
/// `{id, title, image, price, desc}` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched with a plain HTTP GET.
    Http(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl CatalogSource {
    /// Fetch and parse the catalog. No retries; any failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request or read fails, the server answers
    /// with a non-success status, or the body isn't a valid catalog.
    #[instrument(skip(client), fields(source = %self))]
    pub async fn load(&self, client: &reqwest::Client) -> Result<Vec<Product>, CatalogError> {
        let body = match self {
            Self::Http(url) => fetch(client, url).await?,
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        let products = parse_catalog(&body)?;
        debug!(count = products.len(), "Catalog loaded");
        Ok(products)
    }
}

async fn fetch(client: &reqwest::Client, url: &Url) -> Result<String, CatalogError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(CatalogError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

/// Parse a catalog body.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the body isn't a JSON array of products.
pub fn parse_catalog(body: &str) -> Result<Vec<Product>, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse catalog"
        );
        CatalogError::Parse(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use choco_shop_core::{Price, ProductId};

    use super::*;

    const CATALOG: &str = r#"[
        {"id": 1, "title": "Trufas", "image": "./img/trufas.jpg", "price": 1200, "desc": "Trufas de cacao"},
        {"id": 2, "title": "Alfajores", "image": "./img/alfajores.jpg", "price": 850.5, "desc": "Rellenos"}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let products = parse_catalog(CATALOG).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id, ProductId::new(2));
        assert_eq!(products[1].unit_price, Price::from_cents(85050));
    }

    #[test]
    fn test_parse_catalog_rejects_garbage() {
        assert!(matches!(
            parse_catalog("<html>404</html>"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_catalog_rejects_negative_price() {
        let body = r#"[{"id": 1, "title": "x", "image": "", "price": -1, "desc": ""}]"#;
        assert!(parse_catalog(body).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, CATALOG).await.unwrap();

        let source = CatalogSource::File(path.clone());
        let products = source.load(&reqwest::Client::new()).await.unwrap();
        assert_eq!(products.len(), 2);

        let _ = tokio::fs::remove_file(&path).await;
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    /// Serve one HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        Url::parse(&format!("http://{addr}/data/productos.json")).unwrap()
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let url = serve_once("200 OK", CATALOG).await;
        let products = CatalogSource::Http(url)
            .load(&local_client())
            .await
            .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Trufas");
    }

    #[tokio::test]
    async fn test_load_http_error_status() {
        let url = serve_once("404 Not Found", "").await;
        let result = CatalogSource::Http(url.clone())
            .load(&local_client())
            .await;
        assert!(matches!(
            result,
            Err(CatalogError::Status { status: 404, url: ref u }) if *u == url.to_string()
        ));
    }

    #[tokio::test]
    async fn test_load_http_unreachable() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/productos.json")).unwrap();
        let result = CatalogSource::Http(url).load(&local_client()).await;
        assert!(matches!(result, Err(CatalogError::Http(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let source = CatalogSource::File(PathBuf::from("/nonexistent/productos.json"));
        let result = source.load(&reqwest::Client::new()).await;
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_display() {
        let source = CatalogSource::Http(Url::parse("https://shop.example/data/productos.json").unwrap());
        assert_eq!(source.to_string(), "https://shop.example/data/productos.json");
    }
}
