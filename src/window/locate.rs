//! Window locator — find the running surf window carrying a sticker.
//!
//! Walks `_NET_CLIENT_LIST` in window-manager order and returns the first
//! window that both looks like surf (`_SURF_URI` present) and is tagged
//! with the requested sticker.

use super::{Property, WindowId, WindowSystem};
use crate::error::Result;
use crate::sticker::Sticker;

/// Read a property, treating a failed read like a missing one.
///
/// Windows can disappear between listing and querying; that must not
/// abort the scan.
fn read_property<W: WindowSystem>(
    ws: &W,
    window: WindowId,
    property: Property,
) -> Option<String> {
    match ws.get_string_property(window, property) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(
                window = %window,
                property = property.name(),
                error = %e,
                "property unreadable"
            );
            None
        }
    }
}

/// Return the first surf window tagged with `sticker`, if any.
///
/// Only a failure to read the client list is an error. When several
/// windows match, the one listed first wins. A window with no `_STICKER`
/// never matches.
pub fn find_running_surf<W: WindowSystem>(
    ws: &W,
    sticker: &Sticker,
) -> Result<Option<WindowId>> {
    let clients = ws.client_list()?;
    tracing::debug!(clients = clients.len(), sticker = %sticker, "scanning client list");

    for window in clients {
        let Some(uri) = read_property(ws, window, Property::Uri) else {
            continue;
        };
        let Some(tag) = read_property(ws, window, Property::Sticker) else {
            continue;
        };

        if tag == sticker.as_str() {
            tracing::debug!(window = %window, uri = %uri, "found surf window");
            return Ok(Some(window));
        }
    }

    Ok(None)
}
