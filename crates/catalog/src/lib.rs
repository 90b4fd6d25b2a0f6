use foundation::ids::{EmptyModelId, ModelId};
use serde::{Deserialize, Serialize};

/// Where model files live relative to the page.
///
/// Every identifier is expected to have both `<dir><id>.glb` (the mesh shown
/// in the viewer and sent to Scene Viewer) and `<dir><id>.usdz` (Quick Look).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLayout {
    pub dir: String,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            dir: "models/".to_string(),
        }
    }
}

impl AssetLayout {
    pub fn new(dir: impl Into<String>) -> Self {
        let mut dir = dir.into();
        if !dir.is_empty() && !dir.ends_with('/') {
            dir.push('/');
        }
        Self { dir }
    }

    pub fn glb_path(&self, id: &ModelId) -> String {
        format!("{}{}.glb", self.dir, id)
    }

    pub fn usdz_path(&self, id: &ModelId) -> String {
        format!("{}{}.usdz", self.dir, id)
    }
}

/// A selectable dish: the model it shows and the two buttons that pick it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub model: &'static str,
    /// Button in the slide-out menu; picking it also closes the menu.
    pub menu_button: &'static str,
    pub navbar_button: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Menu,
    Navbar,
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        model: "Onionring",
        menu_button: "Onion_Ring",
        navbar_button: "OnionRing_navbar",
    },
    MenuEntry {
        model: "Salad",
        menu_button: "Salad",
        navbar_button: "Salad_navbar",
    },
    MenuEntry {
        model: "Hamburger",
        menu_button: "Hamburger",
        navbar_button: "Hamburger_navbar",
    },
    MenuEntry {
        model: "TruffleSoup",
        menu_button: "Truffle_Soup",
        navbar_button: "TruffleSoup_navbar",
    },
    MenuEntry {
        model: "BBQRibs",
        menu_button: "Pork_rib",
        navbar_button: "Porkrib_navbar",
    },
    MenuEntry {
        model: "KoreaChicken_Final",
        menu_button: "Rice_teriyaki",
        navbar_button: "Riceteriyaki_navbar",
    },
    MenuEntry {
        model: "FrenchFried_Final",
        menu_button: "French_fried",
        navbar_button: "Frenchfried_navbar",
    },
    MenuEntry {
        model: "Corn_Final",
        menu_button: "Corn_ribs",
        navbar_button: "Cornribs_navbar",
    },
    MenuEntry {
        model: "AmericanFriedRice_Final",
        menu_button: "Tomato_sauce_fried_rice",
        navbar_button: "Tomatosaucefriedrice_navbar",
    },
    MenuEntry {
        model: "Penne_Final",
        menu_button: "Truffle_pasta",
        navbar_button: "Trufflepasta_navbar",
    },
];

pub const INITIAL_MODEL: &str = "Onionring";

impl MenuEntry {
    pub fn model_id(&self) -> Result<ModelId, EmptyModelId> {
        ModelId::new(self.model)
    }

    pub fn buttons(&self) -> [(&'static str, ButtonKind); 2] {
        [
            (self.menu_button, ButtonKind::Menu),
            (self.navbar_button, ButtonKind::Navbar),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn asset_paths_follow_layout() {
        let layout = AssetLayout::default();
        let id = ModelId::new("Salad").expect("id");
        assert_eq!(layout.glb_path(&id), "models/Salad.glb");
        assert_eq!(layout.usdz_path(&id), "models/Salad.usdz");
    }

    #[test]
    fn layout_dir_gets_trailing_slash() {
        let layout = AssetLayout::new("assets/3d");
        let id = ModelId::new("Hamburger").expect("id");
        assert_eq!(layout.glb_path(&id), "assets/3d/Hamburger.glb");
    }

    #[test]
    fn button_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for entry in MENU {
            for (id, _) in entry.buttons() {
                assert!(seen.insert(id), "duplicate button id {id}");
            }
        }
        assert_eq!(seen.len(), MENU.len() * 2);
    }

    #[test]
    fn both_buttons_resolve_to_the_same_model() {
        let entry = MENU
            .iter()
            .find(|e| e.model == "BBQRibs")
            .expect("ribs on the menu");
        assert_eq!(
            entry.buttons(),
            [
                ("Pork_rib", ButtonKind::Menu),
                ("Porkrib_navbar", ButtonKind::Navbar)
            ]
        );
    }

    #[test]
    fn initial_model_is_on_the_menu() {
        assert!(MENU.iter().any(|e| e.model == INITIAL_MODEL));
        assert!(MENU.iter().all(|e| e.model_id().is_ok()));
    }

    #[test]
    fn layout_round_trips_through_json() {
        let layout: AssetLayout = serde_json::from_str(r#"{"dir": "cdn/"}"#).expect("json");
        assert_eq!(layout, AssetLayout::new("cdn/"));
    }
}
