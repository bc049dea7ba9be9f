//! Screen routes and the back stack.
//!
//! Controllers never switch screens themselves; operations that end on a
//! different screen return the [`Route`] to go to and the shell applies it.
use crate::catalog::Color;
use crate::ids::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ResetPassword,
    /// Home grid of categories. `refresh` asks the screen to reload on entry.
    Home {
        refresh: bool,
    },
    Profile,
    ChangePassword,
    CreateCategory,
    CreateArticle,
    /// Every article of the user, with the category strip on top.
    CategoryList,
    /// Articles of one category.
    SelectedCategory {
        id: CategoryId,
        title: String,
        color: Color,
    },
    Search,
}

impl Route {
    /// Whether the screen reads `userId` on entry.
    pub fn requires_identity(&self) -> bool {
        !matches!(self, Route::Login | Route::Register | Route::ResetPassword)
    }
}

/// A form submission that leaves the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text the backend attached to its success response, if any.
    pub message: Option<String>,
    pub next: Route,
}

impl Outcome {
    pub fn new(message: Option<String>, next: Route) -> Self {
        Self { message, next }
    }
}

/// Stack of visited routes. The bottom entry is never popped.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack always holds at least the initial route
        &self.stack[self.stack.len() - 1]
    }

    /// Go to `route`. If it is already on the stack, unwind back to it
    /// instead of pushing a duplicate, replacing its parameters.
    pub fn navigate(&mut self, route: Route) {
        let same_screen = |r: &Route| std::mem::discriminant(r) == std::mem::discriminant(&route);
        if let Some(pos) = self.stack.iter().position(same_screen) {
            self.stack.truncate(pos);
        }
        tracing::debug!(route = ?route, depth = self.stack.len() + 1, "Navigate");
        self.stack.push(route);
    }

    /// Pop the current route. Returns `false` at the bottom of the stack.
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Drop the whole history and start again at `route` (logout, identity loss).
    pub fn reset(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
