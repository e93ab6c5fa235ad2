//! Page widget state. Each widget is created by an initializer that receives
//! its handles explicitly; a widget whose elements are missing is `None`.

use std::collections::HashMap;

pub const THEME_KEY: &str = "ww-theme";

/// String-keyed preference storage (browser local storage, a cookie jar, ...).
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Preferences carried in a request's `Cookie` header.
#[derive(Debug, Default, Clone)]
pub struct CookieStorage {
    values: HashMap<String, String>,
    changed: Vec<String>,
}

impl CookieStorage {
    pub fn from_header(header: Option<&str>) -> Self {
        let values = header
            .unwrap_or_default()
            .split(';')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Self {
            values,
            changed: Vec::new(),
        }
    }

    /// `Set-Cookie` values for every key written since parsing.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.changed
            .iter()
            .filter_map(|key| {
                let value = self.values.get(key)?;
                Some(format!("{key}={value}; Path=/; Max-Age=31536000; SameSite=Lax"))
            })
            .collect()
    }
}

impl Storage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if !self.changed.iter().any(|changed| changed == key) {
            self.changed.push(key.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Value of the `data-theme` document attribute; dark is the default
    /// and carries no attribute.
    pub fn data_attribute(self) -> Option<&'static str> {
        match self {
            Theme::Light => Some("light"),
            Theme::Dark => None,
        }
    }
}

#[derive(Debug)]
pub struct ThemeToggle<S: Storage> {
    storage: S,
    theme: Theme,
}

impl<S: Storage> ThemeToggle<S> {
    pub fn init(storage: S) -> Self {
        let theme = match storage.get(THEME_KEY).as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        };
        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn click(&mut self) -> Theme {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.storage.set(THEME_KEY, self.theme.as_str());
        self.theme
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Slide-in navigation panel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Drawer {
    open: bool,
}

impl Drawer {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn aria_hidden(&self) -> &'static str {
        if self.open { "false" } else { "true" }
    }

    pub fn backdrop_hidden(&self) -> bool {
        !self.open
    }

    pub fn locks_scroll(&self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plan {
    #[default]
    Half,
    Full,
}

impl Plan {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "half" => Some(Plan::Half),
            "full" => Some(Plan::Full),
            _ => None,
        }
    }
}

/// Half/full marathon training tabs; exactly one panel is visible.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tabs {
    active: Plan,
}

impl Tabs {
    pub fn init(active: Plan) -> Self {
        Self { active }
    }

    pub fn is_selected(&self, plan: Plan) -> bool {
        self.active == plan
    }

    pub fn is_hidden(&self, plan: Plan) -> bool {
        !self.is_selected(plan)
    }
}

/// Full-size image overlay for gallery thumbnails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lightbox {
    src: Option<String>,
}

impl Lightbox {
    /// Opens from a thumbnail's `data-full` attribute; no attribute, no-op.
    pub fn open_from(&mut self, data_full: Option<&str>) {
        if let Some(src) = data_full.filter(|src| !src.is_empty()) {
            self.src = Some(src.to_string());
        }
    }

    pub fn is_open(&self) -> bool {
        self.src.is_some()
    }

    pub fn src(&self) -> &str {
        self.src.as_deref().unwrap_or_default()
    }
}

/// Which widget elements a page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageElements {
    pub theme_toggle: bool,
    pub drawer: bool,
    pub tabs: bool,
    pub lightbox: bool,
}

impl PageElements {
    pub const ALL: Self = Self {
        theme_toggle: true,
        drawer: true,
        tabs: true,
        lightbox: true,
    };
}

#[derive(Debug)]
pub struct PageWidgets<S: Storage> {
    pub theme: Option<ThemeToggle<S>>,
    pub drawer: Option<Drawer>,
    pub tabs: Option<Tabs>,
    pub lightbox: Option<Lightbox>,
}

impl<S: Storage> PageWidgets<S> {
    pub fn init(elements: PageElements, storage: S, plan: Plan) -> Self {
        Self {
            theme: elements.theme_toggle.then(|| ThemeToggle::init(storage)),
            drawer: elements.drawer.then(Drawer::default),
            tabs: elements.tabs.then(|| Tabs::init(plan)),
            lightbox: elements.lightbox.then(Lightbox::default),
        }
    }

    pub fn body_scroll_locked(&self) -> bool {
        self.drawer.as_ref().is_some_and(Drawer::locks_scroll)
            || self.lightbox.as_ref().is_some_and(Lightbox::is_open)
    }

    pub fn data_theme(&self) -> Option<&'static str> {
        self.theme
            .as_ref()
            .and_then(|toggle| toggle.theme().data_attribute())
    }
}

// Dismissal only happens in the browser (Escape, backdrop and overlay clicks);
// these mirror the script's handlers so its rules are checked here.
#[cfg(test)]
impl Drawer {
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn key_down(&mut self, key: &str) {
        if key == "Escape" {
            self.close();
        }
    }
}

#[cfg(test)]
impl Tabs {
    pub fn select(&mut self, plan: Plan) {
        self.active = plan;
    }
}

#[cfg(test)]
impl Lightbox {
    pub fn close(&mut self) {
        self.src = None;
    }

    /// Clicks on the image itself bubble to the overlay and are ignored.
    pub fn overlay_click(&mut self, target_is_overlay: bool) {
        if target_is_overlay {
            self.close();
        }
    }

    pub fn key_down(&mut self, key: &str) {
        if self.is_open() && key == "Escape" {
            self.close();
        }
    }
}

#[cfg(test)]
impl<S: Storage> PageWidgets<S> {
    pub fn key_down(&mut self, key: &str) {
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.key_down(key);
        }
        if let Some(lightbox) = self.lightbox.as_mut() {
            lightbox.key_down(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_survives_a_simulated_reload() {
        let mut toggle = ThemeToggle::init(MemoryStorage::default());
        assert_eq!(toggle.theme(), Theme::Dark);
        assert_eq!(toggle.click(), Theme::Light);

        let reloaded = ThemeToggle::init(toggle.into_storage());
        assert_eq!(reloaded.theme(), Theme::Light);
        assert_eq!(reloaded.theme().data_attribute(), Some("light"));

        let mut reloaded = reloaded;
        reloaded.click();
        let storage = reloaded.into_storage();
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(ThemeToggle::init(storage).theme(), Theme::Dark);
    }

    #[test]
    fn cookie_storage_round_trips_theme() {
        let storage = CookieStorage::from_header(Some("a=1; ww-theme=light"));
        let mut toggle = ThemeToggle::init(storage);
        assert_eq!(toggle.theme(), Theme::Light);
        toggle.click();

        let headers = toggle.into_storage().set_cookie_headers();
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("ww-theme=dark;"));
    }

    #[test]
    fn drawer_closes_on_escape_only() {
        let mut drawer = Drawer::default();
        assert_eq!(drawer.aria_hidden(), "true");
        drawer.open();
        assert!(drawer.locks_scroll());
        assert!(!drawer.backdrop_hidden());
        drawer.key_down("Enter");
        assert!(drawer.is_open());
        drawer.key_down("Escape");
        assert!(!drawer.is_open());
        assert_eq!(drawer.aria_hidden(), "true");
    }

    #[test]
    fn tabs_are_mutually_exclusive() {
        let mut tabs = Tabs::default();
        assert!(tabs.is_selected(Plan::Half));
        assert!(tabs.is_hidden(Plan::Full));
        tabs.select(Plan::Full);
        assert!(tabs.is_selected(Plan::Full));
        assert!(tabs.is_hidden(Plan::Half));
        assert_eq!(Plan::parse("marathon"), None);
    }

    #[test]
    fn lightbox_opens_from_data_attribute() {
        let mut lightbox = Lightbox::default();
        lightbox.open_from(None);
        assert!(!lightbox.is_open());

        lightbox.open_from(Some("/img/full/1.jpg"));
        assert_eq!(lightbox.src(), "/img/full/1.jpg");
        lightbox.overlay_click(false);
        assert!(lightbox.is_open());
        lightbox.overlay_click(true);
        assert_eq!(lightbox.src(), "");
    }

    #[test]
    fn missing_elements_leave_widgets_unwired() {
        let elements = PageElements {
            theme_toggle: false,
            drawer: true,
            tabs: false,
            lightbox: true,
        };
        let mut page = PageWidgets::init(elements, MemoryStorage::default(), Plan::Full);
        assert!(page.theme.is_none());
        assert!(page.tabs.is_none());
        assert_eq!(page.data_theme(), None);

        page.lightbox.as_mut().unwrap().open_from(Some("x.jpg"));
        assert!(page.body_scroll_locked());
        page.key_down("Escape");
        assert!(!page.body_scroll_locked());
    }
}
