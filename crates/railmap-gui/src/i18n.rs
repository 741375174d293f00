//! Static label tables for the map views.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    En,
    #[default]
    De,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::De];

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "Deutsch",
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("map.topoTitle", "Network Topology"),
    ("map.topoSubtitle", "Live visualization of stations"),
    ("map.settings.title", "Map Settings"),
    ("map.settings.minTraffic", "Min Traffic Filter"),
    ("map.settings.trains", "trains"),
    ("map.settings.adjustHint", "Adjust to hide smaller stations."),
    ("map.settings.visibleLines", "Visible Lines"),
    ("map.settings.reset", "Reset"),
    ("map.legend", "Legend"),
    ("map.hub", "Hub"),
    ("map.zoomToFit", "Zoom to fit"),
    ("map.loading", "Loading network…"),
    ("map.unavailable", "Network data unavailable"),
    ("nav.map", "Network Map"),
    ("nav.settings", "Settings"),
    ("status.loaded", "Loaded"),
    ("status.stations", "stations"),
    ("status.links", "links"),
    ("settings.theme", "Theme"),
    ("settings.language", "Language"),
    ("settings.uiScale", "UI Scale"),
    ("settings.showLegend", "Show legend"),
    ("settings.openPanelOnStart", "Open map settings on start"),
];

const DE: &[(&str, &str)] = &[
    ("map.topoTitle", "Netzwerktopologie"),
    ("map.topoSubtitle", "Live-Visualisierung von Stationen"),
    ("map.settings.title", "Karteneinstellungen"),
    ("map.settings.minTraffic", "Min. Verkehrsaufkommen"),
    ("map.settings.trains", "Züge"),
    ("map.settings.adjustHint", "Anpassen, um kleinere Stationen auszublenden."),
    ("map.settings.visibleLines", "Sichtbare Linien"),
    ("map.settings.reset", "Zurücksetzen"),
    ("map.legend", "Legende"),
    ("map.hub", "Knotenpunkt"),
    ("map.zoomToFit", "Einpassen"),
    ("map.loading", "Netz wird geladen…"),
    ("map.unavailable", "Netzdaten nicht verfügbar"),
    ("nav.map", "Netzkarte"),
    ("nav.settings", "Einstellungen"),
    ("status.loaded", "Geladen"),
    ("status.stations", "Stationen"),
    ("status.links", "Verbindungen"),
    ("settings.theme", "Farbschema"),
    ("settings.language", "Sprache"),
    ("settings.uiScale", "UI-Skalierung"),
    ("settings.showLegend", "Legende anzeigen"),
    ("settings.openPanelOnStart", "Karteneinstellungen beim Start öffnen"),
];

/// Resolves translation keys for the active language.
#[derive(Debug, Default)]
pub struct LabelLookup {
    language: Language,
    reported_missing: RefCell<HashSet<String>>,
}

impl LabelLookup {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            reported_missing: RefCell::new(HashSet::new()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Translated label, or the key itself when the table has no entry.
    pub fn label<'a>(&self, key: &'a str) -> Cow<'a, str> {
        let table = match self.language {
            Language::En => EN,
            Language::De => DE,
        };
        if let Some((_, text)) = table.iter().find(|(k, _)| *k == key) {
            return Cow::Borrowed(*text);
        }
        if self.reported_missing.borrow_mut().insert(key.to_string()) {
            tracing::warn!("Missing {:?} label for key {}", self.language, key);
        }
        Cow::Borrowed(key)
    }
}
