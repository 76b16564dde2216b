//! Registrations of cacheable members

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;

use super::identity::{MemberId, OwnerType};
use crate::domain::cache::{CallArgs, KeyTemplate};
use crate::domain::error::BoxError;
use crate::domain::DomainError;

/// Type-erased live instance of an owner type
pub type Instance = Arc<dyn Any + Send + Sync>;

/// The computation behind a cacheable member
pub trait Computation: Send + Sync {
    /// Runs the computation against `instance`
    fn invoke(&self, instance: Instance, args: CallArgs) -> BoxFuture<'static, Result<Value, DomainError>>;
}

/// Adapts a typed async closure over `Arc<T>` into a [`Computation`]
struct FnComputation<T, F> {
    target: String,
    f: F,
    _owner: PhantomData<fn(Arc<T>)>,
}

impl<T, F, Fut, V, E> Computation for FnComputation<T, F>
where
    T: Any + Send + Sync,
    F: Fn(Arc<T>, CallArgs) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
    V: Serialize + Send,
    E: Into<BoxError> + Send,
{
    fn invoke(&self, instance: Instance, args: CallArgs) -> BoxFuture<'static, Result<Value, DomainError>> {
        let instance = match instance.downcast::<T>() {
            Ok(instance) => instance,
            Err(_) => {
                let error = DomainError::resolution(
                    OwnerType::of::<T>().to_string(),
                    format!("resolved instance is not a {}", std::any::type_name::<T>()),
                );
                return futures::future::ready(Err(error)).boxed();
            }
        };

        let target = self.target.clone();
        let fut = (self.f)(instance, args);

        async move {
            let value = fut
                .await
                .map_err(|e| DomainError::computation(target.clone(), e))?;

            serde_json::to_value(value).map_err(|e| {
                DomainError::serialization(format!("Failed to serialize result of {}: {}", target, e))
            })
        }
        .boxed()
    }
}

/// Association between a cacheable member, its key policy and its computation
#[derive(Clone)]
pub struct Registration {
    owner: OwnerType,
    member: MemberId,
    key: KeyTemplate,
    ttl: Option<Duration>,
    computation: Arc<dyn Computation>,
}

impl Registration {
    /// Starts a registration for `member` on owner type `T`
    pub fn builder<T: Any + Send + Sync>(
        member: impl Into<MemberId>,
        key: impl Into<KeyTemplate>,
    ) -> RegistrationBuilder<T> {
        RegistrationBuilder {
            member: member.into(),
            key: key.into(),
            ttl: None,
            _owner: PhantomData,
        }
    }

    pub fn owner(&self) -> &OwnerType {
        &self.owner
    }

    pub fn member(&self) -> &MemberId {
        &self.member
    }

    pub fn key(&self) -> &KeyTemplate {
        &self.key
    }

    /// `None` means the store default
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn computation(&self) -> &Arc<dyn Computation> {
        &self.computation
    }

    /// `Owner::member`, used in logs and errors
    pub fn target(&self) -> String {
        format!("{}::{}", self.owner, self.member)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("owner", &self.owner)
            .field("member", &self.member)
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Builder for [`Registration`]; the computation is supplied last
#[derive(Debug)]
pub struct RegistrationBuilder<T> {
    member: MemberId,
    key: KeyTemplate,
    ttl: Option<Duration>,
    _owner: PhantomData<fn(Arc<T>)>,
}

impl<T: Any + Send + Sync> RegistrationBuilder<T> {
    /// Sets the TTL; zero means the store default
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    pub fn ttl_secs(self, secs: u64) -> Self {
        self.ttl(Duration::from_secs(secs))
    }

    /// Finishes the registration with the member's computation
    pub fn compute<F, Fut, V, E>(self, f: F) -> Registration
    where
        F: Fn(Arc<T>, CallArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        V: Serialize + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let owner = OwnerType::of::<T>();
        let target = format!("{}::{}", owner, self.member);

        Registration {
            owner,
            member: self.member,
            key: self.key,
            ttl: self.ttl,
            computation: Arc::new(FnComputation {
                target,
                f,
                _owner: PhantomData,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Greeter {
        greeting: String,
    }

    struct Other;

    fn greet() -> Registration {
        Registration::builder::<Greeter>("greet", "greet:{0}")
            .ttl_secs(30)
            .compute(|greeter: Arc<Greeter>, args: CallArgs| async move {
                let name: String = args.get(0)?;
                Ok::<_, DomainError>(format!("{}, {}", greeter.greeting, name))
            })
    }

    #[tokio::test]
    async fn test_invoke_computation() {
        let registration = greet();
        let instance: Instance = Arc::new(Greeter {
            greeting: "Hello".to_string(),
        });

        let value = registration
            .computation()
            .invoke(instance, CallArgs::of(&("Ada",)).unwrap())
            .await
            .unwrap();

        assert_eq!(value, json!("Hello, Ada"));
        assert_eq!(registration.ttl(), Some(Duration::from_secs(30)));
        assert_eq!(registration.target(), "Greeter::greet");
    }

    #[tokio::test]
    async fn test_invoke_with_wrong_instance_type() {
        let registration = greet();
        let instance: Instance = Arc::new(Other);

        let result = registration
            .computation()
            .invoke(instance, CallArgs::new())
            .await;

        assert!(matches!(result, Err(DomainError::Resolution { .. })));
    }

    #[tokio::test]
    async fn test_computation_error_carries_target() {
        let registration = Registration::builder::<Greeter>("fail", "fail")
            .compute(|_: Arc<Greeter>, _| async { Err::<(), _>("backend down") });
        let instance: Instance = Arc::new(Greeter {
            greeting: String::new(),
        });

        let error = registration
            .computation()
            .invoke(instance, CallArgs::new())
            .await
            .unwrap_err();

        match error {
            DomainError::Computation { target, .. } => assert_eq!(target, "Greeter::fail"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_ttl_means_store_default() {
        let registration = Registration::builder::<Greeter>("greet", "greet")
            .ttl(Duration::ZERO)
            .compute(|_: Arc<Greeter>, _| async { Ok::<_, DomainError>(1) });

        assert_eq!(registration.ttl(), None);
    }
}
