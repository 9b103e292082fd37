use indexmap::IndexSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: IndexSet<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> u32 {
        if let Some(idx) = self.entries.get_index_of(text) {
            return idx as u32;
        }
        let (idx, _) = self.entries.insert_full(text.to_string());
        idx as u32
    }

    pub fn index_of(&self, text: &str) -> Option<u32> {
        self.entries.get_index_of(text).map(|idx| idx as u32)
    }

    pub fn get(&self, idx: u32) -> Option<&str> {
        self.entries.get_index(idx as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries.into_iter().collect()
    }
}
