//! Navigation between views.

use std::cell::RefCell;
use std::rc::Rc;

/// Path of the item list.
pub const ITEMS_PATH: &str = "items";

/// Path of a single item.
pub fn item_path(id: &str) -> String {
    format!("{ITEMS_PATH}/{id}")
}

pub trait Router {
    fn go(&mut self, path: &str);
}

/// Records where the application was last sent.
#[derive(Debug, Default, Clone)]
pub struct SessionRouter {
    history: Vec<String>,
}

impl SessionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The item id if the current location is an item page.
    pub fn current_item(&self) -> Option<&str> {
        self.current()?
            .strip_prefix(ITEMS_PATH)?
            .strip_prefix('/')
            .filter(|id| !id.is_empty())
    }
}

impl Router for SessionRouter {
    fn go(&mut self, path: &str) {
        self.history.push(path.to_string());
    }
}

/// Lets the host keep reading a router it has handed to the editor.
impl<R: Router> Router for Rc<RefCell<R>> {
    fn go(&mut self, path: &str) {
        self.borrow_mut().go(path);
    }
}
