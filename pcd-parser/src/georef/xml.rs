//! Geo anchor metadata, e.g.
//!
//! ```xml
//! <ModelMetadata version="1">
//!     <SRS>ENU:1.3521,103.8198</SRS>
//!     <SRSOrigin>0,0,0</SRSOrigin>
//! </ModelMetadata>
//! ```
//!
//! The first child holds `lat,long` after a 4-character prefix, the second
//! child holds the `x,y,z` origin.

use std::path::Path;

use pcd_core::georef::GeoAnchor;
use pcd_core::{Error, Result};

const SRS_PREFIX_LEN: usize = 4;

pub fn parse_anchor_xml<P: AsRef<Path>>(path: P) -> Result<GeoAnchor> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let anchor = parse_anchor_str(&text)?;
    log::debug!("{}: {:?}", path.display(), anchor);
    Ok(anchor)
}

pub fn parse_anchor_str(text: &str) -> Result<GeoAnchor> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| Error::format(format!("invalid metadata XML: {e}")))?;
    let mut children = doc.root_element().children().filter(|n| n.is_element());

    let srs = children
        .next()
        .ok_or_else(|| Error::format("metadata XML has no lat/long element"))?;
    let origin = children
        .next()
        .ok_or_else(|| Error::format("metadata XML has no origin element"))?;

    let srs_text = srs.text().unwrap_or_default();
    let lat_long = match srs_text.char_indices().nth(SRS_PREFIX_LEN) {
        Some((i, _)) => &srs_text[i..],
        None => "",
    };
    let [latitude, longitude] = parse_group::<2>(lat_long, srs.tag_name().name())?;
    let [origin_x, origin_y, origin_z] =
        parse_group::<3>(origin.text().unwrap_or_default(), origin.tag_name().name())?;

    Ok(GeoAnchor {
        latitude,
        longitude,
        origin_x,
        origin_y,
        origin_z,
    })
}

fn parse_group<const N: usize>(text: &str, element: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != N {
        return Err(Error::format(format!(
            "<{}> must hold {} comma-separated numbers, found {:?}",
            element, N, text
        )));
    }

    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part.trim().parse().map_err(|_| {
            Error::format(format!("<{element}> value {:?} is not a number", part))
        })?;
    }
    Ok(values)
}
