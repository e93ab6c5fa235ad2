use crate::week::WeekInfo;
use crate::widgets::{PageWidgets, Plan, Storage};

pub fn render_index<S: Storage>(week: &WeekInfo, widgets: &PageWidgets<S>) -> String {
    let theme_attr = widgets
        .data_theme()
        .map(|theme| format!(r#" data-theme="{theme}""#))
        .unwrap_or_default();
    let tabs = widgets.tabs.clone().unwrap_or_default();
    let drawer = widgets.drawer.clone().unwrap_or_default();
    let lightbox = widgets.lightbox.clone().unwrap_or_default();

    INDEX_HTML
        .replace("{{THEME_ATTR}}", &theme_attr)
        .replace("{{BODY_CLASS}}", if widgets.body_scroll_locked() { "no-scroll" } else { "" })
        .replace("{{WEEK_BADGE}}", &week.badge())
        .replace("{{WEEK_INLINE}}", &week.inline())
        .replace("{{PARITY}}", week.parity.label())
        .replace("{{SAT_LOCATION}}", week.parity.saturday_location())
        .replace("{{YEAR}}", &week.year.to_string())
        .replace("{{DRAWER_ARIA}}", drawer.aria_hidden())
        .replace("{{DRAWER_CLASS}}", if drawer.is_open() { "drawer open" } else { "drawer" })
        .replace("{{BACKDROP_HIDDEN}}", hidden_attr(drawer.backdrop_hidden()))
        .replace("{{HALF_ACTIVE}}", active_class(tabs.is_selected(Plan::Half)))
        .replace("{{FULL_ACTIVE}}", active_class(tabs.is_selected(Plan::Full)))
        .replace("{{HALF_SELECTED}}", &tabs.is_selected(Plan::Half).to_string())
        .replace("{{FULL_SELECTED}}", &tabs.is_selected(Plan::Full).to_string())
        .replace("{{HALF_HIDDEN}}", hidden_attr(tabs.is_hidden(Plan::Half)))
        .replace("{{FULL_HIDDEN}}", hidden_attr(tabs.is_hidden(Plan::Full)))
        .replace("{{LIGHTBOX_HIDDEN}}", hidden_attr(!lightbox.is_open()))
        .replace("{{LIGHTBOX_ARIA}}", if lightbox.is_open() { "false" } else { "true" })
        .replace("{{LIGHTBOX_SRC}}", lightbox.src())
        .replace("{{GALLERY}}", &render_gallery())
}

/// A gallery photo: thumbnail shown inline, full image for the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub thumb: &'static str,
    pub full: &'static str,
    pub alt: &'static str,
}

pub const GALLERY: &[Shot] = &[
    Shot {
        thumb: "/img/thumb/park-1.jpg",
        full: "/img/full/park-1.jpg",
        alt: "Group run",
    },
    Shot {
        thumb: "/img/thumb/park-2.jpg",
        full: "/img/full/park-2.jpg",
        alt: "Finish line",
    },
    Shot {
        thumb: "/img/thumb/park-3.jpg",
        full: "/img/full/park-3.jpg",
        alt: "Trail",
    },
];

/// Only photos from the gallery may be opened through the query string.
pub fn gallery_photo(full: &str) -> Option<&'static str> {
    GALLERY.iter().find(|shot| shot.full == full).map(|shot| shot.full)
}

fn render_gallery() -> String {
    GALLERY
        .iter()
        .map(|shot| {
            format!(
                r#"        <button class="shot" type="submit" name="photo" value="{full}" data-full="{full}"><img src="{thumb}" alt="{alt}" /></button>"#,
                full = shot.full,
                thumb = shot.thumb,
                alt = shot.alt,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

fn active_class(active: bool) -> &'static str {
    if active { " active" } else { "" }
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en"{{THEME_ATTR}}>
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Wellness Warriors Running Club</title>
  <style>
    :root {
      --bg: #10151c;
      --ink: #eef2f6;
      --muted: #9aa7b4;
      --card: #18212c;
      --accent: #ff7a45;
      --accent-2: #4fc3a1;
      --shadow: 0 18px 40px rgba(0, 0, 0, 0.35);
    }

    :root[data-theme="light"] {
      --bg: #f7f4ee;
      --ink: #1f2a33;
      --muted: #5e6a74;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(31, 42, 51, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      line-height: 1.5;
    }

    body.no-scroll {
      overflow: hidden;
    }

    header.top {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 16px 20px;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      padding: 0 20px 48px;
      display: grid;
      gap: 24px;
    }

    section.card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .badges {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .badge {
      border-radius: 999px;
      padding: 4px 12px;
      font-weight: 600;
      background: var(--accent);
      color: #fff;
    }

    .badge.alt {
      background: var(--accent-2);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: #fff;
    }

    .drawer {
      position: fixed;
      inset: 0 auto 0 0;
      width: min(300px, 80vw);
      background: var(--card);
      transform: translateX(-100%);
      transition: transform 150ms ease;
      padding: 24px;
      z-index: 20;
    }

    .drawer.open {
      transform: translateX(0);
    }

    .drawer a {
      display: block;
      color: var(--ink);
      padding: 8px 0;
    }

    .backdrop {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.5);
      opacity: 0;
      transition: opacity 150ms ease;
      z-index: 10;
    }

    .backdrop.show {
      opacity: 1;
    }

    .tabs {
      display: flex;
      gap: 6px;
    }

    .tab {
      background: transparent;
      color: var(--muted);
    }

    .tab.active {
      background: var(--accent-2);
      color: #fff;
    }

    .panel {
      display: none;
    }

    .panel.active {
      display: block;
    }

    .gallery {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .shot {
      padding: 0;
      background: none;
      border-radius: 12px;
      overflow: hidden;
    }

    .shot img {
      width: 100%;
      display: block;
    }

    .lightbox {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.85);
      display: grid;
      place-items: center;
      z-index: 30;
    }

    .lightbox[hidden] {
      display: none;
    }

    .lightbox img {
      max-width: 92vw;
      max-height: 86vh;
      border-radius: 12px;
    }

    .lightbox .close {
      position: absolute;
      top: 16px;
      right: 16px;
    }

    form.signup {
      display: grid;
      gap: 12px;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
    }

    input {
      border-radius: 12px;
      border: 1px solid var(--muted);
      padding: 10px 12px;
      background: transparent;
      color: var(--ink);
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #e0584b;
    }

    .status[data-type="ok"] {
      color: var(--accent-2);
    }

    footer {
      text-align: center;
      color: var(--muted);
      padding: 24px;
    }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <header class="top">
    <form method="get" action="/">
      <button id="drawerOpen" type="submit" name="menu" value="open" aria-controls="drawer">Menu</button>
    </form>
    <strong>Wellness Warriors</strong>
    <form method="post" action="/theme">
      <button id="themeToggle" type="submit" aria-label="Toggle theme">Theme</button>
    </form>
  </header>

  <nav id="drawer" class="{{DRAWER_CLASS}}" aria-hidden="{{DRAWER_ARIA}}">
    <a id="drawerClose" href="/" aria-label="Close menu">Close</a>
    <a href="/#schedule" data-close>Schedule</a>
    <a href="/#training" data-close>Training</a>
    <a href="/#gallery" data-close>Gallery</a>
    <a href="/#signup" data-close>Sign up</a>
  </nav>
  <div id="drawerBackdrop" class="backdrop"{{BACKDROP_HIDDEN}}></div>

  <main>
    <section id="schedule" class="card">
      <div class="badges">
        <span id="weekBadge" class="badge">{{WEEK_BADGE}}</span>
        <span id="parityBadge" class="badge alt">{{PARITY}}</span>
      </div>
      <h1>Run with us</h1>
      <p>This is <span id="weekInline">{{WEEK_INLINE}}</span>. Saturday's long run meets at
        <strong id="satLocationInline">{{SAT_LOCATION}}</strong>.</p>
      <p>Next Saturday location: <span id="satLocation">{{SAT_LOCATION}}</span></p>
    </section>

    <section id="training" class="card">
      <h2>Training plans</h2>
      <form class="tabs" role="tablist" method="get" action="/">
        <button id="tabHalf" class="tab{{HALF_ACTIVE}}" type="submit" name="plan" value="half" role="tab" aria-selected="{{HALF_SELECTED}}">Half marathon</button>
        <button id="tabFull" class="tab{{FULL_ACTIVE}}" type="submit" name="plan" value="full" role="tab" aria-selected="{{FULL_SELECTED}}">Full marathon</button>
      </form>
      <div id="panelHalf" class="panel{{HALF_ACTIVE}}" role="tabpanel"{{HALF_HIDDEN}}>
        <p>12 weeks, three runs a week, long run building to 12 miles.</p>
      </div>
      <div id="panelFull" class="panel{{FULL_ACTIVE}}" role="tabpanel"{{FULL_HIDDEN}}>
        <p>18 weeks, four runs a week, long run building to 20 miles.</p>
      </div>
    </section>

    <section id="gallery" class="card">
      <h2>Gallery</h2>
      <form class="gallery" method="get" action="/">
{{GALLERY}}
      </form>
    </section>

    <section id="signup" class="card">
      <h2>Sign up for a race</h2>
      <form id="signupForm" class="signup">
        <input name="raceId" placeholder="Race id" required />
        <input name="name" placeholder="Your name" minlength="2" required />
        <button type="submit">Sign up</button>
      </form>
      <p id="signupStatus" class="status"></p>
      <ul id="runnerList"></ul>
    </section>
  </main>

  <div id="lightbox" class="lightbox" aria-hidden="{{LIGHTBOX_ARIA}}"{{LIGHTBOX_HIDDEN}}>
    <a id="lightboxClose" class="close" href="/#gallery" aria-label="Close">Close</a>
    <img id="lightboxImg" src="{{LIGHTBOX_SRC}}" alt="" />
  </div>

  <footer>&copy; <span id="year">{{YEAR}}</span> Wellness Warriors</footer>
  <script src="/script.js" defer></script>
</body>
</html>
"##;

pub const SCRIPT_JS: &str = r#"(() => {
  const byId = (id) => document.getElementById(id);

  function isoWeek(date) {
    const d = new Date(Date.UTC(date.getFullYear(), date.getMonth(), date.getDate()));
    const day = d.getUTCDay() || 7;
    d.setUTCDate(d.getUTCDate() + 4 - day);
    const yearStart = new Date(Date.UTC(d.getUTCFullYear(), 0, 1));
    return Math.ceil(((d - yearStart) / 86400000 + 1) / 7);
  }

  function setWeek() {
    const week = isoWeek(new Date());
    const even = week % 2 === 0;
    const parity = even ? "Even week" : "Odd week";
    const location = even ? "Busse Woods" : "Century Park";
    const set = (id, text) => {
      const el = byId(id);
      if (el) el.textContent = text;
    };
    set("weekBadge", `Week ${week}`);
    set("weekInline", `Week ${week} (${parity.toLowerCase()})`);
    set("parityBadge", parity);
    set("satLocationInline", location);
    set("satLocation", location);
  }

  function initTheme() {
    const toggle = byId("themeToggle");
    if (!toggle) return;
    const root = document.documentElement;
    const apply = (theme) => {
      if (theme === "light") root.setAttribute("data-theme", "light");
      else root.removeAttribute("data-theme");
    };
    // The cookie also changes through the no-script form, so it wins when present.
    const cookie = document.cookie
      .split("; ")
      .find((pair) => pair.startsWith("ww-theme="));
    if (cookie) {
      const theme = cookie.slice("ww-theme=".length) === "light" ? "light" : "dark";
      apply(theme);
      localStorage.setItem("ww-theme", theme);
    } else {
      apply(localStorage.getItem("ww-theme") === "light" ? "light" : "dark");
    }

    toggle.addEventListener("click", (event) => {
      event.preventDefault();
      const next = root.getAttribute("data-theme") === "light" ? "dark" : "light";
      apply(next);
      localStorage.setItem("ww-theme", next);
      document.cookie = `ww-theme=${next}; Path=/; Max-Age=31536000; SameSite=Lax`;
    });
  }

  function initDrawer() {
    const drawer = byId("drawer");
    const backdrop = byId("drawerBackdrop");
    const openBtn = byId("drawerOpen");
    const closeBtn = byId("drawerClose");
    if (!drawer || !backdrop || !openBtn || !closeBtn) return;

    const open = () => {
      drawer.setAttribute("aria-hidden", "false");
      drawer.classList.add("open");
      backdrop.hidden = false;
      backdrop.classList.add("show");
      document.body.classList.add("no-scroll");
    };
    const close = () => {
      drawer.setAttribute("aria-hidden", "true");
      drawer.classList.remove("open");
      backdrop.classList.remove("show");
      setTimeout(() => (backdrop.hidden = true), 150);
      document.body.classList.remove("no-scroll");
    };

    openBtn.addEventListener("click", (event) => {
      event.preventDefault();
      open();
    });
    closeBtn.addEventListener("click", (event) => {
      event.preventDefault();
      close();
    });
    backdrop.addEventListener("click", close);
    drawer.querySelectorAll("[data-close]").forEach((link) => link.addEventListener("click", close));
    document.addEventListener("keydown", (event) => {
      if (event.key === "Escape") close();
    });
  }

  function initTabs() {
    const tabHalf = byId("tabHalf");
    const tabFull = byId("tabFull");
    const panelHalf = byId("panelHalf");
    const panelFull = byId("panelFull");
    if (!tabHalf || !tabFull || !panelHalf || !panelFull) return;

    const select = (half) => {
      tabHalf.classList.toggle("active", half);
      tabFull.classList.toggle("active", !half);
      tabHalf.setAttribute("aria-selected", String(half));
      tabFull.setAttribute("aria-selected", String(!half));
      panelHalf.classList.toggle("active", half);
      panelFull.classList.toggle("active", !half);
      panelHalf.hidden = !half;
      panelFull.hidden = half;
    };

    tabHalf.addEventListener("click", (event) => {
      event.preventDefault();
      select(true);
    });
    tabFull.addEventListener("click", (event) => {
      event.preventDefault();
      select(false);
    });
  }

  function initLightbox() {
    const box = byId("lightbox");
    const img = byId("lightboxImg");
    const closeBtn = byId("lightboxClose");
    if (!box || !img || !closeBtn) return;

    const open = (src) => {
      img.src = src;
      box.hidden = false;
      box.setAttribute("aria-hidden", "false");
      document.body.classList.add("no-scroll");
    };
    const close = () => {
      box.setAttribute("aria-hidden", "true");
      box.hidden = true;
      img.src = "";
      document.body.classList.remove("no-scroll");
    };

    document.querySelectorAll(".shot").forEach((shot) => {
      shot.addEventListener("click", (event) => {
        event.preventDefault();
        const full = shot.getAttribute("data-full");
        if (full) open(full);
      });
    });
    closeBtn.addEventListener("click", (event) => {
      event.preventDefault();
      close();
    });
    box.addEventListener("click", (event) => {
      if (event.target === box) close();
    });
    document.addEventListener("keydown", (event) => {
      if (!box.hidden && event.key === "Escape") close();
    });
  }

  function initSignup() {
    const form = byId("signupForm");
    const status = byId("signupStatus");
    const list = byId("runnerList");
    if (!form || !status || !list) return;

    form.addEventListener("submit", async (event) => {
      event.preventDefault();
      const data = new FormData(form);
      status.textContent = "Signing up...";
      status.removeAttribute("data-type");
      try {
        const res = await fetch("/api/signup", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({ raceId: data.get("raceId"), name: data.get("name") }),
        });
        const body = await res.json();
        if (!res.ok) throw new Error(body.error || "Signup failed");
        list.replaceChildren(...body.runners.map((runner) => {
          const li = document.createElement("li");
          li.textContent = runner;
          return li;
        }));
        status.textContent = `You're in, ${body.name}!`;
        status.dataset.type = "ok";
      } catch (err) {
        status.textContent = err.message;
        status.dataset.type = "error";
      }
    });
  }

  function setYear() {
    const year = byId("year");
    if (year) year.textContent = new Date().getFullYear();
  }

  document.addEventListener("DOMContentLoaded", () => {
    setWeek();
    initTheme();
    initDrawer();
    initTabs();
    initLightbox();
    initSignup();
    setYear();
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{MemoryStorage, PageElements, Storage, THEME_KEY};
    use chrono::NaiveDate;

    fn week() -> WeekInfo {
        WeekInfo::for_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
    }

    #[test]
    fn renders_week_and_year() {
        let widgets = PageWidgets::init(PageElements::ALL, MemoryStorage::default(), Plan::Half);
        let html = render_index(&week(), &widgets);
        assert!(html.contains(r#"<span id="weekBadge" class="badge">Week 2</span>"#));
        assert!(html.contains("Week 2 (even week)"));
        assert!(html.contains(r#"<span id="satLocation">Busse Woods</span>"#));
        assert!(html.contains(r#"<span id="year">2026</span>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn renders_saved_theme_and_selected_tab() {
        let mut storage = MemoryStorage::default();
        storage.set(THEME_KEY, "light");
        let widgets = PageWidgets::init(PageElements::ALL, storage, Plan::Full);
        let html = render_index(&week(), &widgets);
        assert!(html.contains(r#"<html lang="en" data-theme="light">"#));
        assert!(html.contains(r#"id="tabFull" class="tab active""#));
        assert!(html.contains(r#"id="panelHalf" class="panel" role="tabpanel" hidden"#));
        assert!(html.contains(r#"<nav id="drawer" class="drawer" aria-hidden="true">"#));
    }

    #[test]
    fn template_renders_through_to_the_closing_tag() {
        let widgets = PageWidgets::init(PageElements::ALL, MemoryStorage::default(), Plan::Half);
        let html = render_index(&week(), &widgets);
        assert!(html.contains(r##"<a href="/#schedule" data-close>Schedule</a>"##));
        assert!(html.contains(r##"<a href="/#signup" data-close>Sign up</a>"##));
        assert!(html.contains(r#"data-full="/img/full/park-2.jpg""#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn renders_open_drawer_and_lightbox() {
        let mut widgets =
            PageWidgets::init(PageElements::ALL, MemoryStorage::default(), Plan::Half);
        widgets.drawer.as_mut().unwrap().open();
        widgets
            .lightbox
            .as_mut()
            .unwrap()
            .open_from(gallery_photo("/img/full/park-3.jpg"));

        let html = render_index(&week(), &widgets);
        assert!(html.contains(r#"<body class="no-scroll">"#));
        assert!(html.contains(r#"<nav id="drawer" class="drawer open" aria-hidden="false">"#));
        assert!(html.contains(r#"<div id="drawerBackdrop" class="backdrop"></div>"#));
        assert!(html.contains(r#"aria-hidden="false">"#));
        assert!(html.contains(r#"<img id="lightboxImg" src="/img/full/park-3.jpg" alt="" />"#));
    }

    #[test]
    fn only_gallery_photos_open_in_the_lightbox() {
        assert_eq!(gallery_photo("/img/full/park-1.jpg"), Some("/img/full/park-1.jpg"));
        assert_eq!(gallery_photo("\"><script>"), None);
    }

    #[test]
    fn script_syncs_theme_from_cookie_in_both_directions() {
        let init = &SCRIPT_JS[SCRIPT_JS.find("function initTheme").unwrap()..];
        let init = &init[..init.find("toggle.addEventListener").unwrap()];
        assert!(init.contains("document.cookie"));
        assert!(init.contains(r#"root.removeAttribute("data-theme")"#));
        assert!(init.contains(r#"localStorage.setItem("ww-theme", theme)"#));
    }
}
