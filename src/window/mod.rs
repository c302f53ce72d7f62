//! WindowSystem trait — the X11 capabilities a dispatch needs.
//!
//! The concrete adapter lives in [`x11`]. Everything else takes
//! `&impl WindowSystem` so it can run against [`fake::FakeWindows`] in
//! tests.

pub mod locate;
pub mod x11;

use std::fmt;

use crate::error::Result;

/// An X11 top-level window id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Window properties shared with surf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Set by surf to the URI it is showing. Its presence marks a surf window.
    Uri,
    /// Watched by surf; writing a URI here navigates the window.
    Go,
    /// Our tag, written once after launch.
    Sticker,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Self::Uri => "_SURF_URI",
            Self::Go => "_SURF_GO",
            Self::Sticker => "_STICKER",
        }
    }
}

/// Access to the window manager's client list and per-window string
/// properties.
pub trait WindowSystem {
    /// Top-level windows in the order the window manager reports them.
    fn client_list(&self) -> Result<Vec<WindowId>>;

    /// Read a string property. `Ok(None)` if the window doesn't carry it.
    fn get_string_property(&self, window: WindowId, property: Property)
    -> Result<Option<String>>;

    /// Replace a property with an 8-bit `STRING` value.
    ///
    /// Takes raw bytes so non-UTF-8 file paths reach the browser intact.
    fn set_string_property(&self, window: WindowId, property: Property, value: &[u8])
    -> Result<()>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::{Property, WindowId, WindowSystem};
    use crate::error::{Error, Result};

    type WriteHook = Box<dyn Fn(WindowId, Property, &[u8]) + Send + Sync>;

    /// In-memory window system that records every property write.
    #[derive(Default)]
    pub struct FakeWindows {
        pub clients: Vec<WindowId>,
        pub props: Mutex<HashMap<(WindowId, Property), String>>,
        pub writes: Mutex<Vec<(WindowId, Property, Vec<u8>)>>,
        pub fail_client_list: bool,
        /// Windows whose property reads fail, as for a window destroyed mid-scan.
        pub unreadable: HashSet<WindowId>,
        pub on_write: Option<WriteHook>,
    }

    impl FakeWindows {
        /// Add a client carrying the given `_SURF_URI` and `_STICKER`.
        pub fn with_client(mut self, id: u32, uri: Option<&str>, sticker: Option<&str>) -> Self {
            let window = WindowId(id);
            self.clients.push(window);
            let mut props = self.props.lock().unwrap();
            if let Some(uri) = uri {
                props.insert((window, Property::Uri), uri.to_string());
            }
            if let Some(sticker) = sticker {
                props.insert((window, Property::Sticker), sticker.to_string());
            }
            drop(props);
            self
        }

        pub fn writes(&self) -> Vec<(WindowId, Property, Vec<u8>)> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl WindowSystem for FakeWindows {
        fn client_list(&self) -> Result<Vec<WindowId>> {
            if self.fail_client_list {
                return Err(Error::Enumeration("no window manager".into()));
            }
            Ok(self.clients.clone())
        }

        fn get_string_property(
            &self,
            window: WindowId,
            property: Property,
        ) -> Result<Option<String>> {
            if self.unreadable.contains(&window) {
                return Err(Error::Enumeration(format!("BadWindow {window}")));
            }
            Ok(self.props.lock().unwrap().get(&(window, property)).cloned())
        }

        fn set_string_property(
            &self,
            window: WindowId,
            property: Property,
            value: &[u8],
        ) -> Result<()> {
            self.props
                .lock()
                .unwrap()
                .insert((window, property), String::from_utf8_lossy(value).into_owned());
            self.writes
                .lock()
                .unwrap()
                .push((window, property, value.to_vec()));
            if let Some(hook) = &self.on_write {
                hook(window, property, value);
            }
            Ok(())
        }
    }
}
