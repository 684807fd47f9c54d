// src/models/asset.rs
// DOCUMENTATION: Asset URL composition
// PURPOSE: Icons, symbols and images are addressed by (path, name, mimetype)

use reqwest::Url;

/// Compose the download URL of an asset
/// DOCUMENTATION: Returns `path/name+mimetype` when all three parts are
/// present and non-empty, `path` is an absolute URL that can carry path
/// segments and `mimetype` starts with a dot (e.g. ".png").
///
/// # Example
/// `asset_url(Some("https://cdn.example.org/icons"), Some("park"), Some(".png"))`
/// yields `https://cdn.example.org/icons/park.png`
pub fn asset_url(path: Option<&str>, name: Option<&str>, mimetype: Option<&str>) -> Option<Url> {
    let path = path.filter(|p| !p.is_empty())?;
    let name = name.filter(|n| !n.is_empty())?;
    let mimetype = mimetype.filter(|m| !m.is_empty() && m.starts_with('.'))?;

    let mut url = Url::parse(path).ok()?;
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty();
        segments.push(&format!("{}{}", name, mimetype));
    }
    Some(url)
}
