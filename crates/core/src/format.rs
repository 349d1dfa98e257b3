//! Display helpers for prices, dates, order states and product images

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend route that serves uploaded product images
pub const IMAGE_ROUTE: &str = "/api/files/images/";

/// Resolve a product image reference to an absolute URL
///
/// Absolute `http(s)` URLs are returned unchanged, backend-relative paths are
/// prefixed with `base_url`, and anything else is treated as a bare file name
/// under the image route.
pub fn resolve_image_url(base_url: &str, image: Option<&str>) -> Option<String> {
    let image = image.map(str::trim).filter(|image| !image.is_empty())?;

    if image.starts_with("http://") || image.starts_with("https://") {
        return Some(image.to_string());
    }

    let base = base_url.trim_end_matches('/');
    if image.starts_with('/') {
        Some(format!("{base}{image}"))
    } else {
        Some(format!("{base}{IMAGE_ROUTE}{image}"))
    }
}

/// Render a price in yuan with two decimals
pub fn format_price(price: f64) -> String {
    format!("¥{price:.2}")
}

/// Render a backend timestamp as `YYYY/MM/DD HH:MM`
///
/// Accepts RFC 3339 and the zone-less `YYYY-MM-DDTHH:MM[:SS[.fff]]` form the
/// backend emits for local times.
pub fn format_date(raw: &str) -> Option<String> {
    const OUTPUT: &str = "%Y/%m/%d %H:%M";

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format(OUTPUT).to_string());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format(OUTPUT).to_string())
}

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipping,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Shipping => "SHIPPING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Human readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "待支付",
            Self::Paid => "已支付",
            Self::Shipping => "已发货",
            Self::Completed => "已完成",
            Self::Cancelled => "已取消",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "SHIPPING" => Ok(Self::Shipping),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

/// Label for a raw status string, or the string itself when it is unknown
pub fn status_text(raw: &str) -> String {
    raw.parse::<OrderStatus>()
        .map_or_else(|()| raw.to_string(), |status| status.label().to_string())
}
