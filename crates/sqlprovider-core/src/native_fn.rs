//! Native routine storage and call context.
//!
//! Provider routines are plain Rust closures registered against a provider
//! type. [`NativeFn`] type-erases them so routines of any shape can be stored
//! uniformly; [`CallContext`] gives the closure its receiver and arguments and
//! collects the return value.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::convert::{FromDynamic, IntoDynamic};
use crate::native_error::NativeError;
use crate::{Dynamic, ParamMap, ProviderContext, TypeHash};

/// Type-erased native routine.
///
/// The inner callable is wrapped in `Arc` so resolved routines can be shared
/// between statement sources and threads.
pub struct NativeFn {
    /// Routine identity (see [`TypeHash::from_routine`]).
    pub id: TypeHash,
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    /// Create a new NativeFn from a closure with a specific ID.
    pub fn new<F>(id: TypeHash, f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        Self::from_callable(id, f)
    }

    /// Create a new NativeFn from any [`NativeCallable`] implementation.
    pub fn from_callable<C>(id: TypeHash, callable: C) -> Self
    where
        C: NativeCallable + Send + Sync + 'static,
    {
        Self {
            id,
            inner: Arc::new(callable),
        }
    }

    /// Call this routine with the given context.
    pub fn call(&self, ctx: &mut CallContext<'_>) -> Result<(), NativeError> {
        self.inner.call(ctx)
    }

    /// Clone this NativeFn, sharing the same underlying callable.
    pub fn clone_arc(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Clone for NativeFn {
    fn clone(&self) -> Self {
        self.clone_arc()
    }
}

/// Trait for callable native routines.
pub trait NativeCallable {
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<(), NativeError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext<'_>) -> Result<(), NativeError>,
{
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<(), NativeError> {
        (self)(ctx)
    }
}

/// Context for a single native routine call.
///
/// ```ignore
/// let id: i64 = ctx.arg(0)?;
/// ctx.set_return(format!("SELECT * FROM users WHERE id = {id}"));
/// ```
pub struct CallContext<'a> {
    /// Receiver for instance routines
    this: Option<&'a (dyn Any + Send + Sync)>,
    args: &'a [Dynamic],
    return_slot: Dynamic,
}

impl<'a> CallContext<'a> {
    /// Create a new call context. The return slot starts out null.
    pub fn new(this: Option<&'a (dyn Any + Send + Sync)>, args: &'a [Dynamic]) -> Self {
        Self {
            this,
            args,
            return_slot: Dynamic::Null,
        }
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Get a raw reference to an argument slot.
    pub fn arg_slot(&self, index: usize) -> Result<&'a Dynamic, NativeError> {
        self.args
            .get(index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds {
                index,
                count: self.args.len(),
            })
    }

    /// Get a typed argument value.
    pub fn arg<T: FromDynamic>(&self, index: usize) -> Result<T, NativeError> {
        let slot = self.arg_slot(index)?;
        T::from_dynamic(slot).map_err(NativeError::Conversion)
    }

    /// Borrow a string argument without copying it.
    pub fn arg_str(&self, index: usize) -> Result<&'a str, NativeError> {
        let slot = self.arg_slot(index)?;
        slot.as_str().ok_or_else(|| {
            NativeError::Conversion(crate::ConversionError::TypeMismatch {
                expected: "string",
                actual: slot.type_name(),
            })
        })
    }

    /// Borrow a name-keyed map argument.
    pub fn arg_map(&self, index: usize) -> Result<&'a ParamMap, NativeError> {
        let slot = self.arg_slot(index)?;
        slot.as_map().ok_or_else(|| {
            NativeError::Conversion(crate::ConversionError::TypeMismatch {
                expected: "map",
                actual: slot.type_name(),
            })
        })
    }

    /// Borrow the injected provider context argument.
    pub fn arg_context(&self, index: usize) -> Result<&'a ProviderContext, NativeError> {
        let slot = self.arg_slot(index)?;
        slot.as_context().ok_or_else(|| {
            NativeError::Conversion(crate::ConversionError::TypeMismatch {
                expected: "ProviderContext",
                actual: slot.type_name(),
            })
        })
    }

    /// Borrow a native domain object argument.
    pub fn arg_native<T: Any>(&self, index: usize) -> Result<&'a T, NativeError> {
        let slot = self.arg_slot(index)?;
        slot.downcast_ref::<T>().ok_or_else(|| {
            NativeError::Conversion(crate::ConversionError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual: slot.type_name(),
            })
        })
    }

    /// Get the receiver of an instance routine.
    pub fn this<T: Any>(&self) -> Result<&'a T, NativeError> {
        let this = self
            .this
            .ok_or_else(|| NativeError::invalid_this("routine called without a receiver"))?;
        this.downcast_ref::<T>().ok_or_else(|| {
            NativeError::invalid_this(format!(
                "type mismatch: expected {}",
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn has_this(&self) -> bool {
        self.this.is_some()
    }

    /// Set a typed return value.
    pub fn set_return<T: IntoDynamic>(&mut self, value: T) {
        self.return_slot = value.into_dynamic();
    }

    /// Take the return value, leaving null behind.
    pub fn take_return(&mut self) -> Dynamic {
        std::mem::replace(&mut self.return_slot, Dynamic::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Provider {
        table: &'static str,
    }

    #[test]
    fn call_closure_and_collect_return() {
        let f = NativeFn::new(TypeHash::from_name("f"), |ctx| {
            let id: i64 = ctx.arg(0)?;
            ctx.set_return(format!("id = {id}"));
            Ok(())
        });

        let args = [Dynamic::Int(5)];
        let mut ctx = CallContext::new(None, &args);
        f.call(&mut ctx).unwrap();
        assert_eq!(ctx.take_return(), Dynamic::String("id = 5".into()));
        assert_eq!(ctx.take_return(), Dynamic::Null);
    }

    #[test]
    fn missing_argument_is_out_of_bounds() {
        let ctx = CallContext::new(None, &[]);
        assert!(matches!(
            ctx.arg::<i64>(0),
            Err(NativeError::ArgumentIndexOutOfBounds { index: 0, count: 0 })
        ));
    }

    #[test]
    fn receiver_access() {
        let provider = Provider { table: "users" };
        let ctx = CallContext::new(Some(&provider as &(dyn Any + Send + Sync)), &[]);
        assert_eq!(ctx.this::<Provider>().unwrap().table, "users");
        assert!(matches!(ctx.this::<String>(), Err(NativeError::InvalidThis { .. })));

        let ctx = CallContext::new(None, &[]);
        assert!(!ctx.has_this());
        assert!(ctx.this::<Provider>().is_err());
    }

    #[test]
    fn borrowed_argument_accessors() {
        let args = [
            Dynamic::String("x".into()),
            Dynamic::Map(ParamMap::new().with("a", 1)),
            Dynamic::Context(ProviderContext::default()),
        ];
        let ctx = CallContext::new(None, &args);
        assert_eq!(ctx.arg_str(0).unwrap(), "x");
        assert_eq!(ctx.arg_map(1).unwrap().len(), 1);
        assert!(ctx.arg_context(2).is_ok());
        assert!(ctx.arg_map(0).is_err());
    }

    struct Fixed(&'static str);

    impl NativeCallable for Fixed {
        fn call(&self, ctx: &mut CallContext<'_>) -> Result<(), NativeError> {
            ctx.set_return(self.0);
            Ok(())
        }
    }

    #[test]
    fn trait_callable() {
        let f = NativeFn::from_callable(TypeHash::from_name("fixed"), Fixed("SELECT 1"));
        let mut ctx = CallContext::new(None, &[]);
        f.call(&mut ctx).unwrap();
        assert_eq!(ctx.take_return(), Dynamic::String("SELECT 1".into()));
    }

    #[test]
    fn clone_shares_callable() {
        let f = NativeFn::new(TypeHash::from_name("f"), |_| Ok(()));
        let g = f.clone();
        assert_eq!(f.id, g.id);
    }
}
