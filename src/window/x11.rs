//! X11 adapter — connection, client list, string property access.
//!
//! Wraps `x11rb::rust_connection::RustConnection`. Atoms are interned once
//! at connect time; the context is built in `main` and passed by reference
//! to the locator, launcher and delivery.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Atom, AtomEnum, PropMode, Window};
use x11rb::rust_connection::RustConnection;

use super::{Property, WindowId, WindowSystem};
use crate::error::{Error, Result};

/// Pre-interned X11 atoms.
struct Atoms {
    net_client_list: Atom,
    surf_uri: Atom,
    surf_go: Atom,
    sticker: Atom,
}

impl Atoms {
    fn get(&self, property: Property) -> Atom {
        match property {
            Property::Uri => self.surf_uri,
            Property::Go => self.surf_go,
            Property::Sticker => self.sticker,
        }
    }
}

/// X11 connection context.
pub struct X11Context {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl X11Context {
    /// Connect to `$DISPLAY` and intern the atoms we use.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::Connection(format!("connect failed: {e}")))?;

        let root = conn.setup().roots[screen_num].root;

        let net_client_list = intern(&conn, b"_NET_CLIENT_LIST")?;
        let [surf_uri, surf_go, sticker] = [Property::Uri, Property::Go, Property::Sticker]
            .map(|p| intern(&conn, p.name().as_bytes()));

        Ok(Self {
            conn,
            root,
            atoms: Atoms {
                net_client_list,
                surf_uri: surf_uri?,
                surf_go: surf_go?,
                sticker: sticker?,
            },
        })
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    Ok(xproto::intern_atom(conn, false, name)
        .map_err(|e| Error::Connection(format!("intern_atom: {e}")))?
        .reply()
        .map_err(|e| Error::Connection(format!("intern_atom reply: {e}")))?
        .atom)
}

impl WindowSystem for X11Context {
    /// Read `_NET_CLIENT_LIST` on the root window.
    ///
    /// A missing property means no EWMH window manager is running, which
    /// is reported as an error rather than an empty list.
    fn client_list(&self) -> Result<Vec<WindowId>> {
        let reply = xproto::get_property(
            &self.conn,
            false,
            self.root,
            self.atoms.net_client_list,
            AtomEnum::WINDOW,
            0,
            u32::MAX,
        )
        .map_err(|e| Error::Enumeration(format!("get_property _NET_CLIENT_LIST: {e}")))?
        .reply()
        .map_err(|e| Error::Enumeration(format!("get_property reply: {e}")))?;

        if reply.type_ == x11rb::NONE {
            return Err(Error::Enumeration(
                "_NET_CLIENT_LIST not set on root window".into(),
            ));
        }

        let windows = reply
            .value32()
            .ok_or_else(|| {
                Error::Enumeration(format!(
                    "_NET_CLIENT_LIST has format {}, expected 32",
                    reply.format
                ))
            })?
            .map(WindowId)
            .collect();

        Ok(windows)
    }

    fn get_string_property(
        &self,
        window: WindowId,
        property: Property,
    ) -> Result<Option<String>> {
        let reply = xproto::get_property(
            &self.conn,
            false,
            window.0,
            self.atoms.get(property),
            AtomEnum::ANY,
            0,
            u32::MAX,
        )
        .map_err(|e| Error::Enumeration(format!("get_property {}: {e}", property.name())))?
        .reply()
        .map_err(|e| {
            Error::Enumeration(format!("get_property {} reply: {e}", property.name()))
        })?;

        if reply.type_ == x11rb::NONE {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()))
    }

    fn set_string_property(
        &self,
        window: WindowId,
        property: Property,
        value: &[u8],
    ) -> Result<()> {
        let write_error = |reason: String| Error::PropertyWrite {
            property: property.name(),
            reason,
        };

        let len = u32::try_from(value.len()).map_err(|_| write_error("value too long".into()))?;

        // check() flushes the request and waits for a possible error reply.
        xproto::change_property(
            &self.conn,
            PropMode::REPLACE,
            window.0,
            self.atoms.get(property),
            AtomEnum::STRING,
            8,
            len,
            value,
        )
        .map_err(|e| write_error(format!("send: {e}")))?
        .check()
        .map_err(|e| write_error(e.to_string()))?;

        tracing::debug!(
            window = %window,
            property = property.name(),
            value = %String::from_utf8_lossy(value),
            "property set"
        );
        Ok(())
    }
}
