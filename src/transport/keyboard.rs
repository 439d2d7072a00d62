#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardButtonKind {
    Callback(String),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub label: String,
    pub kind: KeyboardButtonKind,
}

impl KeyboardButton {
    pub fn callback<S: Into<String>, D: Into<String>>(label: S, data: D) -> Self {
        Self {
            label: label.into(),
            kind: KeyboardButtonKind::Callback(data.into()),
        }
    }

    pub fn url<S: Into<String>, U: Into<String>>(label: S, url: U) -> Self {
        Self {
            label: label.into(),
            kind: KeyboardButtonKind::Url(url.into()),
        }
    }

    pub fn callback_data(&self) -> Option<&str> {
        match &self.kind {
            KeyboardButtonKind::Callback(data) => Some(data),
            KeyboardButtonKind::Url(_) => None,
        }
    }
}

/// Inline keyboard, independent of transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self { rows }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &KeyboardButton> {
        self.rows.iter().flatten()
    }

    pub fn find(&self, label: &str) -> Option<&KeyboardButton> {
        self.buttons().find(|b| b.label == label)
    }
}
