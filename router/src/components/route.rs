use crate::{
    location::Url, params::ParamsMap, RouteMatchId, RoutePattern, RouterError,
};
use core::fmt;
use std::rc::Rc;

/// What a route shows once it matches.
pub enum RouteBody<V> {
    /// A component, called with the matched params.
    Component(fn(ParamsMap) -> V),
    /// A render function, called with the matched params.
    Render(Rc<dyn Fn(&ParamsMap) -> V>),
    /// A ready-made view.
    Children(V),
}

impl<V: Clone> Clone for RouteBody<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Component(f) => Self::Component(*f),
            Self::Render(f) => Self::Render(Rc::clone(f)),
            Self::Children(v) => Self::Children(v.clone()),
        }
    }
}

impl<V> fmt::Debug for RouteBody<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Component(_) => "Component",
            Self::Render(_) => "Render",
            Self::Children(_) => "Children",
        })
    }
}

/// Identity of the view a route produces.
///
/// Routes that share a component function produce the same view, so
/// switching between them keeps it mounted. Components are told apart by
/// function address: the compiler may fold identical function bodies into
/// one, which makes such components share a key. Render functions and
/// children are always owned by their route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Component(usize),
    Route(RouteMatchId),
}

impl<V> RouteBody<V> {
    pub fn view(&self, params: &ParamsMap) -> V
    where
        V: Clone,
    {
        match self {
            Self::Component(component) => component(params.clone()),
            Self::Render(render) => render(params),
            Self::Children(children) => children.clone(),
        }
    }

    pub(crate) fn view_key(&self, id: RouteMatchId) -> ViewKey {
        match self {
            Self::Component(f) => ViewKey::Component(*f as usize),
            Self::Render(_) | Self::Children(_) => ViewKey::Route(id),
        }
    }
}

/// A path pattern with the view to show when it matches.
pub struct Route<V> {
    id: RouteMatchId,
    pattern: RoutePattern,
    body: RouteBody<V>,
}

impl<V> Route<V> {
    pub fn builder() -> RouteBuilder<V> {
        RouteBuilder::default()
    }

    pub fn id(&self) -> RouteMatchId {
        self.id
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn body(&self) -> &RouteBody<V> {
        &self.body
    }

    /// Tests the route against a location. On a match, the params of the
    /// enclosing route come first and this route's own params override them.
    pub fn test(&self, url: &Url, parent: &ParamsMap) -> Option<ParamsMap> {
        let mut params = parent.clone();
        self.pattern.match_into(url, &mut params).then_some(params)
    }

    pub fn view(&self, params: &ParamsMap) -> V
    where
        V: Clone,
    {
        self.body.view(params)
    }

    pub(crate) fn view_key(&self) -> ViewKey {
        self.body.view_key(self.id)
    }
}

impl<V> fmt::Debug for Route<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("body", &self.body)
            .finish()
    }
}

/// Builds a [`Route`]. When more than one body is given, a component wins
/// over a render function, which wins over children.
pub struct RouteBuilder<V> {
    path: Option<String>,
    component: Option<fn(ParamsMap) -> V>,
    render: Option<Rc<dyn Fn(&ParamsMap) -> V>>,
    children: Option<V>,
}

impl<V> Default for RouteBuilder<V> {
    fn default() -> Self {
        Self {
            path: None,
            component: None,
            render: None,
            children: None,
        }
    }
}

impl<V> RouteBuilder<V> {
    /// The pattern to match; defaults to `*`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn component(mut self, component: fn(ParamsMap) -> V) -> Self {
        self.component = Some(component);
        self
    }

    pub fn render(
        mut self,
        render: impl Fn(&ParamsMap) -> V + 'static,
    ) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn children(mut self, children: V) -> Self {
        self.children = Some(children);
        self
    }

    pub fn build(self) -> Result<Route<V>, RouterError> {
        let path = self.path.unwrap_or_else(|| "*".to_string());
        let body = match (self.component, self.render, self.children) {
            (Some(component), _, _) => RouteBody::Component(component),
            (None, Some(render), _) => RouteBody::Render(render),
            (None, None, Some(children)) => RouteBody::Children(children),
            (None, None, None) => return Err(RouterError::NoMatch(path)),
        };
        Ok(Route {
            id: RouteMatchId::new_from_route_id(),
            pattern: RoutePattern::new(&path),
            body,
        })
    }
}
