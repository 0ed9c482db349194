use image::DynamicImage;

/// One unit of content extracted from a single file.
#[derive(Debug, Clone)]
pub enum Fragment {
    Text(String),
    Image(DynamicImage),
}

impl Fragment {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::Text(t) => Some(t),
            Fragment::Image(_) => None,
        }
    }
}

/// Ordered fragments from every file in the most recent batch.
#[derive(Debug, Clone, Default)]
pub struct Context {
    fragments: Vec<Fragment>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, fragments: impl IntoIterator<Item = Fragment>) {
        self.fragments.extend(fragments);
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }
}

impl From<Vec<Fragment>> for Context {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
