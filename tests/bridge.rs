//! Reflection-bridge tests: programs resolving pool symbols against a
//! registered host environment, driven through a parsed class file.

use classfile::JavaClass;
use hostjvm::opcodes::*;
use hostjvm::{Frame, HostClass, HostEnv, HostValue, Slot, VmError};

const EMAIL: &str = "alex@example.com";
const HOST: &str = "sample/Host";

/// Assembles a class file whose constant pool names the host symbols the
/// tests resolve.
struct ClassBuilder {
    entries: Vec<Vec<u8>>,
}

impl ClassBuilder {
    fn new() -> ClassBuilder {
        ClassBuilder { entries: Vec::new() }
    }

    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    fn utf8(&mut self, text: &str) -> u16 {
        let mut entry = vec![0x01];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.push(entry)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut entry = vec![0x07];
        entry.extend_from_slice(&name_index.to_be_bytes());
        self.push(entry)
    }

    fn string(&mut self, text: &str) -> u16 {
        let utf8_index = self.utf8(text);
        let mut entry = vec![0x08];
        entry.extend_from_slice(&utf8_index.to_be_bytes());
        self.push(entry)
    }

    fn int(&mut self, value: i32) -> u16 {
        let mut entry = vec![0x03];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push(entry)
    }

    fn long(&mut self, value: i64) -> u16 {
        let mut entry = vec![0x05];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push(entry)
    }

    fn float(&mut self, value: f32) -> u16 {
        let mut entry = vec![0x04];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push(entry)
    }

    fn double(&mut self, value: f64) -> u16 {
        let mut entry = vec![0x06];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push(entry)
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let mut entry = vec![0x0c];
        entry.extend_from_slice(&name_index.to_be_bytes());
        entry.extend_from_slice(&descriptor_index.to_be_bytes());
        self.push(entry)
    }

    fn field_ref(&mut self, class_index: u16, name: &str, descriptor: &str) -> u16 {
        let nat_index = self.name_and_type(name, descriptor);
        let mut entry = vec![0x09];
        entry.extend_from_slice(&class_index.to_be_bytes());
        entry.extend_from_slice(&nat_index.to_be_bytes());
        self.push(entry)
    }

    fn method_ref(&mut self, class_index: u16, name: &str, descriptor: &str) -> u16 {
        let nat_index = self.name_and_type(name, descriptor);
        let mut entry = vec![0x0a];
        entry.extend_from_slice(&class_index.to_be_bytes());
        entry.extend_from_slice(&nat_index.to_be_bytes());
        self.push(entry)
    }

    fn build(self, this_class: u16, super_class: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xcafe_babeu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&55u16.to_be_bytes());
        out.extend_from_slice(&(self.entries.len() as u16 + 1).to_be_bytes());
        for entry in &self.entries {
            out.extend_from_slice(entry);
        }
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // interfaces
        out.extend_from_slice(&0u16.to_be_bytes()); // fields
        out.extend_from_slice(&0u16.to_be_bytes()); // methods
        out.extend_from_slice(&0u16.to_be_bytes()); // attributes
        out
    }
}

struct Fixture {
    bytes: Vec<u8>,
    c_object: u16,
    c_string: u16,
    c_system: u16,
    email: u16,
    email_utf8: u16,
    int_const: u16,
    long_const: u16,
    float_const: u16,
    double_const: u16,
    f_i: u16,
    f_l: u16,
    f_f: u16,
    f_d: u16,
    f_s: u16,
    f_ii: u16,
    f_ll: u16,
    f_ff: u16,
    f_dd: u16,
    f_ss: u16,
    f_missing: u16,
    m_random: u16,
    m_gc: u16,
    m_length: u16,
    m_upper: u16,
    m_negate: u16,
    m_identity: u16,
    m_missing: u16,
}

fn fixture() -> Fixture {
    let mut b = ClassBuilder::new();
    let c_host = b.class(HOST);
    let c_object = b.class("java/lang/Object");
    let c_string = b.class("java/lang/String");
    let c_system = b.class("java/lang/System");
    let c_math = b.class("java/lang/Math");
    let c_missing = b.class("missing/Klass");

    let email_utf8 = b.utf8(EMAIL);
    let email = {
        let mut entry = vec![0x08];
        entry.extend_from_slice(&email_utf8.to_be_bytes());
        b.push(entry)
    };
    let int_const = b.int(0xff00);
    let long_const = b.long(37);
    let float_const = b.float(2.718);
    let double_const = b.double(3.141);

    let f_i = b.field_ref(c_host, "i", "I");
    let f_l = b.field_ref(c_host, "l", "J");
    let f_f = b.field_ref(c_host, "f", "F");
    let f_d = b.field_ref(c_host, "d", "D");
    let f_s = b.field_ref(c_host, "s", "Ljava/lang/String;");
    let f_ii = b.field_ref(c_host, "ii", "I");
    let f_ll = b.field_ref(c_host, "ll", "J");
    let f_ff = b.field_ref(c_host, "ff", "F");
    let f_dd = b.field_ref(c_host, "dd", "D");
    let f_ss = b.field_ref(c_host, "ss", "Ljava/lang/String;");
    let f_missing = b.field_ref(c_missing, "nope", "I");

    let m_random = b.method_ref(c_math, "random", "()D");
    let m_gc = b.method_ref(c_system, "gc", "()V");
    let m_length = b.method_ref(c_string, "length", "()I");
    let m_upper = b.method_ref(c_string, "toUpperCase", "()Ljava/lang/String;");
    let m_negate = b.method_ref(c_math, "negateExact", "(I)I");
    let m_identity = b.method_ref(c_host, "identity", "(I)I");
    let m_missing = b.method_ref(c_missing, "nope", "()V");

    let bytes = b.build(c_host, c_object);
    Fixture {
        bytes,
        c_object,
        c_string,
        c_system,
        email,
        email_utf8,
        int_const,
        long_const,
        float_const,
        double_const,
        f_i,
        f_l,
        f_f,
        f_d,
        f_s,
        f_ii,
        f_ll,
        f_ff,
        f_dd,
        f_ss,
        f_missing,
        m_random,
        m_gc,
        m_length,
        m_upper,
        m_negate,
        m_identity,
        m_missing,
    }
}

fn host_env() -> HostEnv {
    let mut env = HostEnv::with_builtins();
    env.register(
        HostClass::new(HOST)
            .extends("java/lang/Object")
            .instance_field("i", "I")
            .instance_field("l", "J")
            .instance_field("f", "F")
            .instance_field("d", "D")
            .instance_field("s", "Ljava/lang/String;")
            .static_field("ii", Slot::Int(0xff00))
            .static_field("ll", Slot::Long(37))
            .static_field("ff", Slot::Float(2.718))
            .static_field("dd", Slot::Double(3.141))
            .static_field("ss", Slot::Reference(Some(HostValue::Str(EMAIL.into()).into_ref())))
            .method("identity", "(I)I", |_, arguments| {
                Ok(Some(Slot::Int(arguments[0].int_value()?)))
            }),
    );
    env
}

fn run(
    class: &JavaClass,
    env: &HostEnv,
    seed: Option<Slot>,
    code: &[u8],
) -> Result<Option<Slot>, VmError> {
    let mut frame = Frame::new(Some(class), 0, code).with_env(env);
    if let Some(slot) = seed {
        frame.stack_mut().push(slot);
    }
    frame.run()
}

fn assert_str(slot: &Slot, expected: &str) {
    let reference = slot.reference_value().unwrap().unwrap();
    match &*reference.borrow() {
        HostValue::Str(text) => assert_eq!(expected, text),
        other => panic!("not a string: {:?}", other),
    };
}

#[test]
fn ldc_resolves_pool_constants() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();

    let result =
        run(&class, &env, None, &[LDC, fx.email as u8, ARETURN]).unwrap().unwrap();
    assert_str(&result, EMAIL);

    let result =
        run(&class, &env, None, &[LDC, fx.int_const as u8, IRETURN]).unwrap().unwrap();
    assert_eq!(0xff00, result.int_value().unwrap());

    let result = run(&class, &env, None, &[LDC2_W, 0x00, fx.long_const as u8, LRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(37, result.long_value().unwrap());

    let result = run(&class, &env, None, &[LDC_W, 0x00, fx.float_const as u8, FRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(2.718, result.float_value().unwrap());

    let result = run(&class, &env, None, &[LDC2_W, 0x00, fx.double_const as u8, DRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(3.141, result.double_value().unwrap());

    // A Utf8 item is not a loadable constant.
    let err =
        run(&class, &env, None, &[LDC, fx.email_utf8 as u8, ARETURN]).unwrap_err();
    assert!(matches!(err, VmError::Unsupported { .. }));
}

#[test]
fn instance_field_round_trips() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();
    let host = env.new_instance(HOST).unwrap();
    let seed = || Some(Slot::Reference(Some(host.clone())));

    let cases: [(u8, u16, u8); 4] = [
        (ICONST_1, fx.f_i, IRETURN),
        (LCONST_1, fx.f_l, LRETURN),
        (FCONST_1, fx.f_f, FRETURN),
        (DCONST_1, fx.f_d, DRETURN),
    ];
    for (push, field, ret) in cases {
        let wrote =
            run(&class, &env, seed(), &[push, PUTFIELD, 0x00, field as u8, RETURN]).unwrap();
        assert_eq!(None, wrote);
        let read =
            run(&class, &env, seed(), &[GETFIELD, 0x00, field as u8, ret]).unwrap().unwrap();
        match ret {
            IRETURN => assert_eq!(1, read.int_value().unwrap()),
            LRETURN => assert_eq!(1, read.long_value().unwrap()),
            FRETURN => assert_eq!(1.0, read.float_value().unwrap()),
            _ => assert_eq!(1.0, read.double_value().unwrap()),
        }
    }

    // Reference field: defaults to null, then holds a pool string.
    let read =
        run(&class, &env, seed(), &[GETFIELD, 0x00, fx.f_s as u8, ARETURN]).unwrap().unwrap();
    assert_eq!(Slot::Reference(None), read);
    run(
        &class,
        &env,
        seed(),
        &[LDC, fx.email as u8, PUTFIELD, 0x00, fx.f_s as u8, RETURN],
    )
    .unwrap();
    let read =
        run(&class, &env, seed(), &[GETFIELD, 0x00, fx.f_s as u8, ARETURN]).unwrap().unwrap();
    assert_str(&read, EMAIL);
}

#[test]
fn static_field_round_trips() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();

    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ii as u8, IRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(0xff00, read.int_value().unwrap());
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ll as u8, LRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(37, read.long_value().unwrap());
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ff as u8, FRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(2.718, read.float_value().unwrap());
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_dd as u8, DRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(3.141, read.double_value().unwrap());
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ss as u8, ARETURN])
        .unwrap()
        .unwrap();
    assert_str(&read, EMAIL);

    run(&class, &env, None, &[ICONST_1, PUTSTATIC, 0x00, fx.f_ii as u8, RETURN]).unwrap();
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ii as u8, IRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(1, read.int_value().unwrap());

    run(&class, &env, None, &[LCONST_1, PUTSTATIC, 0x00, fx.f_ll as u8, RETURN]).unwrap();
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ll as u8, LRETURN])
        .unwrap()
        .unwrap();
    assert_eq!(1, read.long_value().unwrap());

    run(
        &class,
        &env,
        None,
        &[ACONST_NULL, PUTSTATIC, 0x00, fx.f_ss as u8, RETURN],
    )
    .unwrap();
    let read = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_ss as u8, ARETURN])
        .unwrap()
        .unwrap();
    assert_eq!(Slot::Reference(None), read);
}

#[test]
fn invocation_escapes_to_host_methods() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();

    let result = run(&class, &env, None, &[INVOKESTATIC, 0x00, fx.m_random as u8, DRETURN])
        .unwrap()
        .unwrap();
    assert!(result.double_value().is_ok());

    let result =
        run(&class, &env, None, &[INVOKESTATIC, 0x00, fx.m_gc as u8, RETURN]).unwrap();
    assert_eq!(None, result);

    let hello = Slot::Reference(Some(HostValue::Str("Hello World".into()).into_ref()));
    let result = run(
        &class,
        &env,
        Some(hello.clone()),
        &[INVOKEVIRTUAL, 0x00, fx.m_length as u8, IRETURN],
    )
    .unwrap()
    .unwrap();
    assert_eq!(11, result.int_value().unwrap());

    let result = run(
        &class,
        &env,
        Some(hello),
        &[INVOKEVIRTUAL, 0x00, fx.m_upper as u8, ARETURN],
    )
    .unwrap()
    .unwrap();
    assert_str(&result, "HELLO WORLD");

    let result = run(
        &class,
        &env,
        None,
        &[BIPUSH, 123, INVOKESTATIC, 0x00, fx.m_negate as u8, INEG, IRETURN],
    )
    .unwrap()
    .unwrap();
    assert_eq!(123, result.int_value().unwrap());
}

#[test]
fn invokevirtual_pops_receiver_from_the_top() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();
    let host = env.new_instance(HOST).unwrap();

    // Argument below, receiver on top.
    let code = [INVOKEVIRTUAL, 0x00, fx.m_identity as u8, IRETURN];
    let mut frame = Frame::new(Some(&class), 0, &code).with_env(&env);
    frame.stack_mut().push(Slot::Int(7));
    frame.stack_mut().push(Slot::Reference(Some(host)));
    let result = frame.run().unwrap().unwrap();
    assert_eq!(7, result.int_value().unwrap());
}

#[test]
fn instanceof_uses_host_assignability() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();

    let result = run(
        &class,
        &env,
        None,
        &[ACONST_NULL, INSTANCEOF, 0x00, fx.c_object as u8, IRETURN],
    )
    .unwrap()
    .unwrap();
    assert_eq!(0, result.int_value().unwrap());

    let result = run(
        &class,
        &env,
        None,
        &[LDC, fx.email as u8, INSTANCEOF, 0x00, fx.c_object as u8, IRETURN],
    )
    .unwrap()
    .unwrap();
    assert_eq!(1, result.int_value().unwrap());

    let result = run(
        &class,
        &env,
        None,
        &[LDC, fx.email as u8, INSTANCEOF, 0x00, fx.c_string as u8, IRETURN],
    )
    .unwrap()
    .unwrap();
    assert_eq!(1, result.int_value().unwrap());

    let result = run(
        &class,
        &env,
        None,
        &[LDC, fx.email as u8, INSTANCEOF, 0x00, fx.c_system as u8, IRETURN],
    )
    .unwrap()
    .unwrap();
    assert_eq!(0, result.int_value().unwrap());
}

#[test]
fn unresolvable_host_symbols_are_unsupported_faults() {
    let fx = fixture();
    let class = JavaClass::parse(&fx.bytes).unwrap();
    let env = host_env();

    let err = run(&class, &env, None, &[GETSTATIC, 0x00, fx.f_missing as u8, IRETURN])
        .unwrap_err();
    assert!(matches!(err, VmError::Unsupported { .. }));

    let err = run(
        &class,
        &env,
        None,
        &[ICONST_1, PUTSTATIC, 0x00, fx.f_missing as u8, RETURN],
    )
    .unwrap_err();
    assert!(matches!(err, VmError::Unsupported { .. }));

    let err = run(&class, &env, None, &[INVOKESTATIC, 0x00, fx.m_missing as u8, RETURN])
        .unwrap_err();
    assert!(matches!(err, VmError::Unsupported { .. }));

    // Without an environment the bridge itself is unreachable.
    let code = [GETSTATIC, 0x00, fx.f_ii as u8, IRETURN];
    let mut frame = Frame::new(Some(&class), 0, &code);
    assert!(matches!(frame.run(), Err(VmError::Unsupported { .. })));
}

#[test]
fn classfile_code_attribute_drives_a_frame() {
    // The full §data-flow: class bytes -> parser -> code attribute -> frame.
    let mut b = ClassBuilder::new();
    let c_this = b.class("sample/Answer");
    let c_super = b.class("java/lang/Object");
    let answer_name = b.utf8("answer");
    let answer_descriptor = b.utf8("()I");
    let code_name = b.utf8("Code");

    let mut out = Vec::new();
    out.extend_from_slice(&0xcafe_babeu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&55u16.to_be_bytes());
    out.extend_from_slice(&(b.entries.len() as u16 + 1).to_be_bytes());
    for entry in &b.entries {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(&0x0021u16.to_be_bytes());
    out.extend_from_slice(&c_this.to_be_bytes());
    out.extend_from_slice(&c_super.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    out.extend_from_slice(&0u16.to_be_bytes()); // fields
    out.extend_from_slice(&1u16.to_be_bytes()); // one method
    out.extend_from_slice(&0x0009u16.to_be_bytes());
    out.extend_from_slice(&answer_name.to_be_bytes());
    out.extend_from_slice(&answer_descriptor.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&code_name.to_be_bytes());
    let bytecode = [BIPUSH, 0x06, ICONST_5, IMUL, IRETURN];
    out.extend_from_slice(&(8 + bytecode.len() as u32).to_be_bytes());
    out.extend_from_slice(&2u16.to_be_bytes()); // max_stack
    out.extend_from_slice(&1u16.to_be_bytes()); // max_locals
    out.extend_from_slice(&(bytecode.len() as u32).to_be_bytes());
    out.extend_from_slice(&bytecode);
    out.extend_from_slice(&0u16.to_be_bytes()); // class attributes

    let class = JavaClass::parse(&out).unwrap();
    let method = class.method("answer").unwrap();
    assert_eq!(Vec::<String>::new(), method.argument_types().unwrap());
    let (max_locals, code) = match method.code_attribute().unwrap() {
        classfile::Attribute::Code { max_locals, bytecode, .. } => {
            (*max_locals as usize, bytecode.clone())
        }
        other => panic!("not a code attribute: {:?}", other),
    };
    let mut frame = Frame::new(Some(&class), max_locals, &code);
    let result = frame.run().unwrap().unwrap();
    assert_eq!(30, result.int_value().unwrap());
}
