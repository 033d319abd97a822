use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use super::command::{Binder, BoundHandler, CommandDescriptor, ControllerCommand, HandlerFuture, HandlerResult};
use super::Key;
use crate::application::errors::BuildError;
use crate::application::messaging::{Arguments, CommandContext};

/// A constructed provider or controller, shared by reference
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Type-erased constructor
pub type Factory = Arc<dyn Fn(&mut Injected) -> Result<Instance, BuildError> + Send + Sync>;

/// Resolved constructor dependencies, handed out in declaration order
pub struct Injected {
    owner: Key,
    values: Vec<Instance>,
    cursor: usize,
}

impl Injected {
    pub fn new(owner: Key, values: Vec<Instance>) -> Self {
        Self {
            owner,
            values,
            cursor: 0,
        }
    }

    /// Next dependency, downcast to `T`
    pub fn next<T: Any + Send + Sync>(&mut self) -> Result<Arc<T>, BuildError> {
        let position = self.cursor;
        self.cursor += 1;
        self.get(position)
    }

    pub fn get<T: Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>, BuildError> {
        let value = self.values.get(position).ok_or_else(|| BuildError::MissingDependency {
            owner: self.owner.name().to_string(),
            position,
            declared: self.values.len(),
        })?;
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| BuildError::InjectionMismatch {
                owner: self.owner.name().to_string(),
                position,
                expected: type_name::<T>(),
            })
    }
}

fn erase<T, F>(constructor: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn(&mut Injected) -> Result<T, BuildError> + Send + Sync + 'static,
{
    Arc::new(move |deps: &mut Injected| {
        let instance: Instance = Arc::new(constructor(deps)?);
        Ok(instance)
    })
}

/// Declaration of a module: what it imports, provides, exports and which
/// controllers it hosts
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub key: Key,
    pub imports: Vec<Key>,
    pub exports: Vec<Key>,
    pub providers: Vec<Key>,
    pub controllers: Vec<Key>,
}

impl ModuleDescriptor {
    pub fn of<M: 'static>() -> Self {
        Self {
            key: Key::of::<M>(),
            imports: Vec::new(),
            exports: Vec::new(),
            providers: Vec::new(),
            controllers: Vec::new(),
        }
    }

    pub fn import<M: 'static>(mut self) -> Self {
        self.imports.push(Key::of::<M>());
        self
    }

    pub fn provide<P: 'static>(mut self) -> Self {
        self.providers.push(Key::of::<P>());
        self
    }

    pub fn export<P: 'static>(mut self) -> Self {
        self.exports.push(Key::of::<P>());
        self
    }

    pub fn controller<C: 'static>(mut self) -> Self {
        self.controllers.push(Key::of::<C>());
        self
    }
}

/// Declaration of a provider: identity, ordered constructor dependencies
/// and the constructor itself
#[derive(Clone)]
pub struct ProviderDescriptor {
    pub key: Key,
    pub dependencies: Vec<Key>,
    pub factory: Factory,
}

impl ProviderDescriptor {
    pub fn of<P: Any + Send + Sync>() -> ProviderBuilder<P> {
        ProviderBuilder {
            dependencies: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("key", &self.key)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

pub struct ProviderBuilder<P> {
    dependencies: Vec<Key>,
    _marker: PhantomData<fn() -> P>,
}

impl<P: Any + Send + Sync> ProviderBuilder<P> {
    pub fn inject<D: 'static>(mut self) -> Self {
        self.dependencies.push(Key::of::<D>());
        self
    }

    pub fn construct<F>(self, constructor: F) -> ProviderDescriptor
    where
        F: Fn(&mut Injected) -> Result<P, BuildError> + Send + Sync + 'static,
    {
        ProviderDescriptor {
            key: Key::of::<P>(),
            dependencies: self.dependencies,
            factory: erase(constructor),
        }
    }
}

/// Declaration of a controller: like a provider, plus its commands
#[derive(Clone)]
pub struct ControllerDescriptor {
    pub key: Key,
    pub dependencies: Vec<Key>,
    pub factory: Factory,
    pub commands: Vec<ControllerCommand>,
}

impl ControllerDescriptor {
    pub fn of<C: Any + Send + Sync>() -> ControllerBuilder<C> {
        ControllerBuilder {
            dependencies: Vec::new(),
            commands: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for ControllerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerDescriptor")
            .field("key", &self.key)
            .field("dependencies", &self.dependencies)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

pub struct ControllerBuilder<C> {
    dependencies: Vec<Key>,
    commands: Vec<ControllerCommand>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Any + Send + Sync> ControllerBuilder<C> {
    pub fn inject<D: 'static>(mut self) -> Self {
        self.dependencies.push(Key::of::<D>());
        self
    }

    /// Attaches `handler` to `descriptor`. The handler receives the
    /// controller instance, the invocation context and the parsed arguments.
    pub fn command<F, Fut>(mut self, descriptor: CommandDescriptor, handler: F) -> Self
    where
        F: Fn(Arc<C>, CommandContext, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let bind: Binder = Arc::new(move |instance: Instance| {
            let this = instance.downcast::<C>().map_err(|_| BuildError::InjectionMismatch {
                owner: Key::of::<C>().name().to_string(),
                position: 0,
                expected: type_name::<C>(),
            })?;
            let handler = Arc::clone(&handler);
            let bound: BoundHandler = Arc::new(move |ctx: CommandContext, args: Arguments| {
                let fut = (handler.as_ref())(Arc::clone(&this), ctx, args);
                Box::pin(fut) as HandlerFuture
            });
            Ok(bound)
        });
        self.commands.push(ControllerCommand { descriptor, bind });
        self
    }

    pub fn construct<F>(self, constructor: F) -> ControllerDescriptor
    where
        F: Fn(&mut Injected) -> Result<C, BuildError> + Send + Sync + 'static,
    {
        ControllerDescriptor {
            key: Key::of::<C>(),
            dependencies: self.dependencies,
            factory: erase(constructor),
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;
    struct Greeter {
        counter: Arc<Counter>,
    }

    #[test]
    fn test_module_builder() {
        struct Root;
        let module = ModuleDescriptor::of::<Root>()
            .provide::<Counter>()
            .export::<Counter>()
            .controller::<Greeter>();
        assert_eq!(module.key, Key::of::<Root>());
        assert_eq!(module.providers, vec![Key::of::<Counter>()]);
        assert_eq!(module.exports, vec![Key::of::<Counter>()]);
        assert_eq!(module.controllers, vec![Key::of::<Greeter>()]);
        assert!(module.imports.is_empty());
    }

    #[test]
    fn test_provider_factory_receives_dependencies() {
        let descriptor = ProviderDescriptor::of::<Greeter>()
            .inject::<Counter>()
            .construct(|deps| Ok(Greeter { counter: deps.next()? }));
        assert_eq!(descriptor.dependencies, vec![Key::of::<Counter>()]);

        let counter: Instance = Arc::new(Counter);
        let mut injected = Injected::new(descriptor.key, vec![counter.clone()]);
        let instance = (descriptor.factory)(&mut injected).unwrap();
        let greeter = instance.downcast::<Greeter>().ok().unwrap();
        let counter = counter.downcast::<Counter>().ok().unwrap();
        assert!(Arc::ptr_eq(&greeter.counter, &counter));
    }

    #[test]
    fn test_injected_type_mismatch() {
        let value: Instance = Arc::new(42u32);
        let mut injected = Injected::new(Key::of::<Greeter>(), vec![value]);
        assert!(matches!(
            injected.next::<Counter>(),
            Err(BuildError::InjectionMismatch { position: 0, .. })
        ));
        assert!(matches!(
            injected.next::<u32>(),
            Err(BuildError::MissingDependency { position: 1, declared: 1, .. })
        ));
    }
}
