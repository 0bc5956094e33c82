//! Spec definitions: what the engine knows about a spec type.
//!
//! Rust has no runtime reflection, so a spec describes itself. A [`TypeDescriptor`] is one level of the ancestor
//! chain: a type name plus its own methods in declaration order, each with its name and a callable body. A
//! [`SpecDefinition`] adds a display name and an instance factory. The `#[spec]` attribute writes both for you
//! through the [`Spec`] trait; building them by hand is equally supported.
//!
//! Inheritance is composition here: a spec embeds its base type as a field and lifts the base's descriptors
//! through [`TypeDescriptor::project`].

use std::fmt::Debug;
use std::rc::Rc;

use crate::error::{Outcome, SpecError};

/// Anything a spec method may return.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Ok(())
    }
}

impl<E: Into<SpecError>> IntoOutcome for Result<(), E> {
    fn into_outcome(self) -> Outcome {
        self.map_err(Into::into)
    }
}

pub(crate) type StepFn<S> = Rc<dyn Fn(&mut S) -> Outcome>;
pub(crate) type ExampleStepFn<S, E> = Rc<dyn Fn(&mut S, &E) -> Outcome>;
pub(crate) type ExamplesFn<E> = Rc<dyn Fn() -> Box<dyn Iterator<Item = E>>>;

/// A method body.
pub(crate) enum Body<S, E> {
    Step(StepFn<S>),
    WithExample(ExampleStepFn<S, E>),
    Examples(ExamplesFn<E>),
}

impl<S, E> Clone for Body<S, E> {
    fn clone(&self) -> Self {
        match self {
            Body::Step(f) => Body::Step(Rc::clone(f)),
            Body::WithExample(f) => Body::WithExample(Rc::clone(f)),
            Body::Examples(f) => Body::Examples(Rc::clone(f)),
        }
    }
}

pub(crate) struct MethodDef<S, E> {
    pub(crate) name: String,
    pub(crate) body: Body<S, E>,
}

/// One level of a spec's ancestor chain.
///
/// ```rust
/// use specrun::TypeDescriptor;
///
/// #[derive(Default)]
/// struct Adding { total: i32 }
///
/// let descriptor = TypeDescriptor::<Adding>::new("Adding")
///     .method("context", |s| s.total = 1)
///     .method("because_we_add_one", |s| s.total += 1)
///     .method("it_should_be_two", |s| specrun::assertions::assert_eq(s.total, 2))
///     .method("helper", |_| ());
///
/// assert_eq!(descriptor.method_names().count(), 4);
/// ```
pub struct TypeDescriptor<S, E = ()> {
    name: String,
    methods: Vec<MethodDef<S, E>>,
}

impl<S: 'static, E: 'static> TypeDescriptor<S, E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    fn push(mut self, name: impl Into<String>, body: Body<S, E>) -> Self {
        self.methods.push(MethodDef {
            name: name.into(),
            body,
        });
        self
    }

    /// Declare a method taking only the instance.
    pub fn method<R: IntoOutcome>(self, name: impl Into<String>, f: impl Fn(&mut S) -> R + 'static) -> Self {
        self.push(name, Body::Step(Rc::new(move |s: &mut S| f(s).into_outcome())))
    }

    /// Declare a method that also takes the current example.
    pub fn method_with_example<R: IntoOutcome>(
        self,
        name: impl Into<String>,
        f: impl Fn(&mut S, &E) -> R + 'static,
    ) -> Self {
        self.push(
            name,
            Body::WithExample(Rc::new(move |s: &mut S, example: &E| f(s, example).into_outcome())),
        )
    }

    /// Declare the example provider. It is always named `examples`.
    pub fn examples<I>(self, f: impl Fn() -> I + 'static) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'static,
    {
        self.push(
            specrun_core::roles::EXAMPLES_METHOD,
            Body::Examples(Rc::new(move || Box::new(f().into_iter()) as Box<dyn Iterator<Item = E>>)),
        )
    }

    /// Lift this descriptor into a type `T` that embeds `S`.
    ///
    /// Every step is re-targeted through `lens`; the type name and method names are unchanged.
    pub fn project<T: 'static>(self, lens: fn(&mut T) -> &mut S) -> TypeDescriptor<T, E> {
        let methods = self
            .methods
            .into_iter()
            .map(|method| {
                let body = match method.body {
                    Body::Step(f) => Body::Step(Rc::new(move |t: &mut T| f(lens(t))) as StepFn<T>),
                    Body::WithExample(f) => {
                        Body::WithExample(Rc::new(move |t: &mut T, e: &E| f(lens(t), e)) as ExampleStepFn<T, E>)
                    }
                    Body::Examples(f) => Body::Examples(f),
                };
                MethodDef {
                    name: method.name,
                    body,
                }
            })
            .collect();
        TypeDescriptor {
            name: self.name,
            methods,
        }
    }
}

impl<S, E> TypeDescriptor<S, E> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared method names, in declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name.as_str())
    }

    pub(crate) fn methods(&self) -> &[MethodDef<S, E>] {
        &self.methods
    }
}

/// Everything needed to run a spec: a display name, an instance factory, and the ancestor chain.
pub struct SpecDefinition<S, E = ()> {
    name: String,
    factory: Rc<dyn Fn() -> S>,
    /// Most-derived first.
    ancestry: Vec<TypeDescriptor<S, E>>,
}

impl<S: 'static, E: Debug + 'static> SpecDefinition<S, E> {
    /// A spec with a single level. The display name defaults to the descriptor's type name.
    pub fn new(factory: impl Fn() -> S + 'static, descriptor: TypeDescriptor<S, E>) -> Self {
        Self::from_parts(factory, vec![descriptor])
    }

    /// Build from a full ancestor chain, most-derived first.
    pub fn from_parts(factory: impl Fn() -> S + 'static, ancestry: Vec<TypeDescriptor<S, E>>) -> Self {
        let name = ancestry.first().map(|d| d.name.clone()).unwrap_or_default();
        Self {
            name,
            factory: Rc::new(factory),
            ancestry,
        }
    }

    /// Append a less-derived level.
    pub fn inherits(mut self, ancestor: TypeDescriptor<S, E>) -> Self {
        self.ancestry.push(ancestor);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<S, E> SpecDefinition<S, E> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ancestry(&self) -> &[TypeDescriptor<S, E>] {
        &self.ancestry
    }

    pub(crate) fn create(&self) -> S {
        (self.factory)()
    }
}

/// A type that describes itself as a spec. Usually written by `#[spec]`.
pub trait Spec: Sized + 'static {
    /// The example type for parametrised specs; `()` otherwise.
    type Example: Debug + 'static;

    /// This type's descriptor followed by its ancestors', most-derived first.
    fn ancestry() -> Vec<TypeDescriptor<Self, Self::Example>>;

    /// A fresh instance. One is created per context.
    fn create() -> Self;

    fn definition() -> SpecDefinition<Self, Self::Example> {
        SpecDefinition::from_parts(Self::create, Self::ancestry())
    }
}
