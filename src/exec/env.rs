//! The host environment: the reflection-bridge capability the interpreter
//! resolves field and method symbols against.
//!
//! Instead of a hidden process-global lookup, the registry is constructed
//! once and attached to every frame that needs it. Host methods are plain
//! Rust closures, registered per class like native methods.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::model::{HostObject, HostRef, HostValue, Slot, VmError, VmResult};

pub type HostMethodHandler = Box<dyn Fn(Option<&HostRef>, &[Slot]) -> VmResult<Option<Slot>>>;

struct HostMethod {
    handler: HostMethodHandler,
}

/// A host class: assignability, static field storage, instance field
/// declarations and invokable methods.
pub struct HostClass {
    name: String,
    assignable: HashSet<String>,
    statics: RefCell<HashMap<String, Slot>>,
    fields: Vec<(String, String)>,
    methods: HashMap<String, HostMethod>,
}

impl HostClass {
    pub fn new(name: &str) -> HostClass {
        HostClass {
            name: name.to_string(),
            assignable: HashSet::new(),
            statics: RefCell::new(HashMap::new()),
            fields: Vec::new(),
            methods: HashMap::new(),
        }
    }

    /// Declares a supertype (class or interface) instances are assignable to.
    pub fn extends(mut self, name: &str) -> HostClass {
        self.assignable.insert(name.to_string());
        self
    }

    /// Declares an instance field; new instances get its default value.
    pub fn instance_field(mut self, name: &str, descriptor: &str) -> HostClass {
        self.fields.push((name.to_string(), descriptor.to_string()));
        self
    }

    /// Declares a static field with its initial slot.
    pub fn static_field(mut self, name: &str, initial: Slot) -> HostClass {
        self.statics.borrow_mut().insert(name.to_string(), initial);
        self
    }

    /// Registers an invokable method under its name and descriptor.
    pub fn method<F>(mut self, name: &str, descriptor: &str, handler: F) -> HostClass
    where
        F: Fn(Option<&HostRef>, &[Slot]) -> VmResult<Option<Slot>> + 'static,
    {
        self.methods
            .insert(format!("{}{}", name, descriptor), HostMethod { handler: Box::new(handler) });
        self
    }
}

/// Registry of host classes, keyed by fully-qualified slash name.
#[derive(Default)]
pub struct HostEnv {
    classes: HashMap<String, HostClass>,
}

impl HostEnv {
    pub fn new() -> HostEnv {
        HostEnv { classes: HashMap::new() }
    }

    /// A registry pre-populated with the small core the interpreter's own
    /// constants and tests rely on.
    pub fn with_builtins() -> HostEnv {
        let mut env = HostEnv::new();
        env.register(HostClass::new("java/lang/Object"));
        env.register(
            HostClass::new("java/lang/String")
                .extends("java/lang/Object")
                .extends("java/lang/CharSequence")
                .method("length", "()I", |receiver, _| {
                    let text = string_receiver(receiver)?;
                    Ok(Some(Slot::Int(text.chars().count() as i32)))
                })
                .method("toUpperCase", "()Ljava/lang/String;", |receiver, _| {
                    let text = string_receiver(receiver)?;
                    let upper = HostValue::Str(text.to_uppercase()).into_ref();
                    Ok(Some(Slot::Reference(Some(upper))))
                }),
        );
        env.register(
            HostClass::new("java/lang/Math")
                .extends("java/lang/Object")
                .method("random", "()D", |_, _| Ok(Some(Slot::Double(subsecond_fraction()))))
                .method("negateExact", "(I)I", |_, arguments| {
                    let value = argument(arguments, 0)?.int_value()?;
                    match value.checked_neg() {
                        Some(negated) => Ok(Some(Slot::Int(negated))),
                        None => Err(VmError::unsupported("negate integer overflow")),
                    }
                }),
        );
        env.register(
            HostClass::new("java/lang/System")
                .extends("java/lang/Object")
                .method("gc", "()V", |_, _| Ok(None)),
        );
        env
    }

    pub fn register(&mut self, class: HostClass) {
        debug!("host class registered: {}", class.name);
        self.classes.insert(class.name.clone(), class);
    }

    fn class(&self, name: &str) -> VmResult<&HostClass> {
        self.classes
            .get(name)
            .ok_or_else(|| VmError::unsupported(format!("find class {}", name)))
    }

    /// Builds a fresh instance with declared fields at their defaults.
    pub fn new_instance(&self, class_name: &str) -> VmResult<HostRef> {
        let class = self.class(class_name)?;
        let fields = class
            .fields
            .iter()
            .map(|(name, descriptor)| (name.clone(), default_slot(descriptor)))
            .collect();
        Ok(HostValue::Object(HostObject { class_name: class.name.clone(), fields }).into_ref())
    }

    /// Reads a named field (static when `target` is absent or the class
    /// declares it static), coerced per the descriptor.
    pub fn get_field(
        &self,
        target: Option<&HostRef>,
        class_name: &str,
        field_name: &str,
        descriptor: &str,
    ) -> VmResult<Slot> {
        self.read_field(target, class_name, field_name, descriptor).map_err(|cause| {
            VmError::unsupported_by(format!("access field {}:{}", class_name, field_name), cause)
        })
    }

    fn read_field(
        &self,
        target: Option<&HostRef>,
        class_name: &str,
        field_name: &str,
        descriptor: &str,
    ) -> VmResult<Slot> {
        let class = self.class(class_name)?;
        if let Some(slot) = class.statics.borrow().get(field_name) {
            return coerce_read(slot, descriptor);
        }
        let target = target
            .ok_or_else(|| VmError::unsupported(format!("read field {} of null", field_name)))?;
        match &*target.borrow() {
            HostValue::Object(object) => {
                let slot = object.fields.get(field_name).ok_or_else(|| {
                    VmError::unsupported(format!("find field {}", field_name))
                })?;
                coerce_read(slot, descriptor)
            }
            other => Err(VmError::unsupported(format!("read fields of {}", other.type_name()))),
        }
    }

    /// Writes a named field, coercing the slot per the descriptor.
    pub fn put_field(
        &self,
        target: Option<&HostRef>,
        class_name: &str,
        field_name: &str,
        descriptor: &str,
        value: Slot,
    ) -> VmResult<()> {
        self.write_field(target, class_name, field_name, descriptor, value).map_err(|cause| {
            VmError::unsupported_by(format!("access field {}:{}", class_name, field_name), cause)
        })
    }

    fn write_field(
        &self,
        target: Option<&HostRef>,
        class_name: &str,
        field_name: &str,
        descriptor: &str,
        value: Slot,
    ) -> VmResult<()> {
        let class = self.class(class_name)?;
        let coerced = coerce_write(&value, descriptor)?;
        if class.statics.borrow().contains_key(field_name) {
            class.statics.borrow_mut().insert(field_name.to_string(), coerced);
            return Ok(());
        }
        let target = target
            .ok_or_else(|| VmError::unsupported(format!("write field {} of null", field_name)))?;
        match &mut *target.borrow_mut() {
            HostValue::Object(object) => {
                if !object.fields.contains_key(field_name) {
                    return Err(VmError::unsupported(format!("find field {}", field_name)));
                }
                object.fields.insert(field_name.to_string(), coerced);
                Ok(())
            }
            other => Err(VmError::unsupported(format!("write fields of {}", other.type_name()))),
        }
    }

    /// Invokes a host method body. The returned slot is checked against the
    /// descriptor's return type; `None` means void.
    pub fn invoke(
        &self,
        receiver: Option<&HostRef>,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
        arguments: &[Slot],
    ) -> VmResult<Option<Slot>> {
        self.call(receiver, class_name, method_name, descriptor, arguments).map_err(|cause| {
            VmError::unsupported_by(
                format!("execute method {}:{}", class_name, method_name),
                cause,
            )
        })
    }

    fn call(
        &self,
        receiver: Option<&HostRef>,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
        arguments: &[Slot],
    ) -> VmResult<Option<Slot>> {
        let class = self.class(class_name)?;
        let key = format!("{}{}", method_name, descriptor);
        let method = class
            .methods
            .get(&key)
            .ok_or_else(|| VmError::unsupported(format!("find method {}", key)))?;
        let result = (method.handler)(receiver, arguments)?;
        coerce_return(result, descriptor)
    }

    /// Host-side assignability check backing `instanceof`.
    pub fn instance_of(&self, value: &HostRef, class_name: &str) -> VmResult<bool> {
        if !self.classes.contains_key(class_name) {
            return Err(VmError::unsupported(format!(
                "instanceof {} on {}",
                class_name,
                value.borrow().type_name()
            )));
        }
        let runtime = value.borrow().type_name().to_string();
        if runtime == class_name || class_name == "java/lang/Object" {
            return Ok(true);
        }
        Ok(self
            .classes
            .get(&runtime)
            .map(|class| class.assignable.contains(class_name))
            .unwrap_or(false))
    }
}

fn argument(arguments: &[Slot], index: usize) -> VmResult<&Slot> {
    arguments.get(index).ok_or(VmError::StackUnderflow)
}

fn string_receiver(receiver: Option<&HostRef>) -> VmResult<String> {
    let receiver =
        receiver.ok_or_else(|| VmError::unsupported("invoke instance method on null"))?;
    match &*receiver.borrow() {
        HostValue::Str(text) => Ok(text.clone()),
        other => Err(VmError::unsupported(format!("treat {} as a string", other.type_name()))),
    }
}

fn subsecond_fraction() -> f64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    f64::from(nanos) / 1_000_000_000.0
}

/// Default value for a declared field, keyed by its descriptor.
fn default_slot(descriptor: &str) -> Slot {
    match descriptor.chars().next() {
        Some('Z' | 'B' | 'S' | 'C' | 'I') => Slot::Int(0),
        Some('J') => Slot::Long(0),
        Some('F') => Slot::Float(0.0),
        Some('D') => Slot::Double(0.0),
        _ => Slot::Reference(None),
    }
}

/// Marshals a stored field slot out, typed by the descriptor's trailing
/// type character.
fn coerce_read(slot: &Slot, descriptor: &str) -> VmResult<Slot> {
    match descriptor.chars().last() {
        Some('Z' | 'B' | 'S' | 'C' | 'I') => Ok(Slot::Int(slot.int_value()?)),
        Some('J') => Ok(Slot::Long(slot.long_value()?)),
        Some('F') => Ok(Slot::Float(slot.float_value()?)),
        Some('D') => Ok(Slot::Double(slot.double_value()?)),
        _ => Ok(Slot::Reference(slot.reference_value()?)),
    }
}

/// Marshals a slot into a stored field, truncating and re-widening the
/// sub-int types the way the original field bridge does.
fn coerce_write(value: &Slot, descriptor: &str) -> VmResult<Slot> {
    match descriptor.chars().last() {
        Some('Z') => Ok(Slot::Int((value.int_value()? != 0) as i32)),
        Some('B') => Ok(Slot::Int(value.int_value()? as i8 as i32)),
        Some('S') => Ok(Slot::Int(value.int_value()? as i16 as i32)),
        Some('C') => Ok(Slot::Int(value.int_value()? as u16 as i32)),
        Some('I') => Ok(Slot::Int(value.int_value()?)),
        Some('J') => Ok(Slot::Long(value.long_value()?)),
        Some('F') => Ok(Slot::Float(value.float_value()?)),
        Some('D') => Ok(Slot::Double(value.double_value()?)),
        _ => Ok(Slot::Reference(value.reference_value()?)),
    }
}

/// Checks an invocation result against the descriptor's return type.
fn coerce_return(result: Option<Slot>, descriptor: &str) -> VmResult<Option<Slot>> {
    let returned = match descriptor.chars().last() {
        Some('V') => {
            return match result {
                None => Ok(None),
                Some(slot) => Err(VmError::unsupported(format!(
                    "return {} from a void method",
                    slot.type_name()
                ))),
            }
        }
        Some('Z' | 'B' | 'S' | 'C' | 'I') => {
            Slot::Int(result.ok_or_else(missing_return)?.int_value()?)
        }
        Some('J') => Slot::Long(result.ok_or_else(missing_return)?.long_value()?),
        Some('F') => Slot::Float(result.ok_or_else(missing_return)?.float_value()?),
        Some('D') => Slot::Double(result.ok_or_else(missing_return)?.double_value()?),
        _ => Slot::Reference(result.ok_or_else(missing_return)?.reference_value()?),
    };
    Ok(Some(returned))
}

fn missing_return() -> VmError {
    VmError::unsupported("return nothing from a non-void method")
}
