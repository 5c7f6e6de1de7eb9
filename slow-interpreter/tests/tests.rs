use loading::{ClassLoader, ClassLoadingError, InMemoryClassSource};
use memory_manager::MemoryManager;
use rust_jvm_common::classfile::{ACC_ABSTRACT, ACC_FINAL, ACC_INTERFACE, ACC_NATIVE, ACC_PUBLIC, ACC_STATIC, Atype, IInc, InstructionInfo, InvokeInterface};
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use rust_jvm_common::method_shape::MethodShape;
use rust_jvm_common::test_utils::{ClassfileBuilder, code};
use runtime_class_stuff::class_registry::ClassRegistry;
use runtime_class_stuff::LinkError;
use slow_interpreter::exceptions::{ExecutionError, Fault, InstructionError};
use slow_interpreter::jvm_state::JVMState;
use slow_interpreter::string_intern::string_contents;

const STATIC: u16 = ACC_PUBLIC | ACC_STATIC;

fn object() -> ClassfileBuilder {
    let mut object = ClassfileBuilder::new("java/lang/Object");
    object.method("<init>", "()V", ACC_PUBLIC, Some(code(0, 1, vec![InstructionInfo::return_])));
    object
}

/// A class extending `parent` whose constructor chains to the parent's.
fn class(name: &str, parent: &str) -> ClassfileBuilder {
    let mut class = ClassfileBuilder::new(name);
    class.extends(parent);
    let parent_init = class.method_ref(parent, "<init>", "()V");
    class.method("<init>", "()V", ACC_PUBLIC, Some(code(1, 1, vec![
        InstructionInfo::aload(0),
        InstructionInfo::invokespecial(parent_init),
        InstructionInfo::return_,
    ])));
    class
}

fn vm(builders: Vec<ClassfileBuilder>) -> JVMState {
    let mut source = InMemoryClassSource::new();
    source.add(object().build()).unwrap();
    for builder in builders {
        source.add(builder.build()).unwrap();
    }
    JVMState::new(ClassLoader::new(Box::new(source), ClassRegistry::new()), MemoryManager::new(1 << 20))
}

fn run(jvm: &mut JVMState, class: &str, name: &str, desc: &str, args: Vec<JavaValue>) -> Result<Option<JavaValue>, ExecutionError> {
    let class = jvm.classes.load(&ClassName::new(class)).unwrap();
    let method = class.lookup_method(&MethodShape::new(name, desc)).unwrap();
    jvm.run_method(&class, method, args)
}

fn static_value(jvm: &mut JVMState, class: &str, field: &str) -> JavaValue {
    let class = jvm.classes.load(&ClassName::new(class)).unwrap();
    let field = class.field_group.get(&class.name, field).unwrap().clone();
    jvm.memory.read_field(class.static_base().unwrap(), field.offset, field.kind).unwrap()
}

#[test]
fn add_two_constants() {
    let mut main = class("t/Main", "java/lang/Object");
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(1),
        InstructionInfo::iconst(2),
        InstructionInfo::iadd,
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(3)));
}

#[test]
fn counting_loop() {
    let mut main = class("t/Main", "java/lang/Object");
    main.method("test", "()I", STATIC, Some(code(2, 2, vec![
        InstructionInfo::iconst(0),
        InstructionInfo::istore(0),
        InstructionInfo::iconst(1),
        InstructionInfo::istore(1),
        InstructionInfo::iload(1),
        InstructionInfo::bipush(10),
        InstructionInfo::if_icmpgt(13),
        InstructionInfo::iload(0),
        InstructionInfo::iload(1),
        InstructionInfo::iadd,
        InstructionInfo::istore(0),
        InstructionInfo::iinc(IInc { index: 1, const_: 1 }),
        InstructionInfo::goto_(4),
        InstructionInfo::iload(0),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(55)));
}

#[test]
fn arguments_fill_locals_in_order() {
    let mut main = class("t/Main", "java/lang/Object");
    let sub = main.method_ref("t/Main", "sub", "(II)I");
    let widen = main.method_ref("t/Main", "widen", "(JI)J");
    let ten = main.long(10);
    main.method("sub", "(II)I", STATIC, Some(code(2, 2, vec![
        InstructionInfo::iload(0),
        InstructionInfo::iload(1),
        InstructionInfo::isub,
        InstructionInfo::ireturn,
    ])));
    main.method("widen", "(JI)J", STATIC, Some(code(4, 3, vec![
        InstructionInfo::lload(0),
        InstructionInfo::iload(2),
        InstructionInfo::i2l,
        InstructionInfo::lsub,
        InstructionInfo::lreturn,
    ])));
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(3),
        InstructionInfo::iconst(4),
        InstructionInfo::invokestatic(sub),
        InstructionInfo::ireturn,
    ])));
    main.method("testWide", "()J", STATIC, Some(code(3, 0, vec![
        InstructionInfo::ldc2_w(ten),
        InstructionInfo::iconst(4),
        InstructionInfo::invokestatic(widen),
        InstructionInfo::lreturn,
    ])));
    let mut jvm = vm(vec![main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(-1)));
    assert_eq!(run(&mut jvm, "t/Main", "testWide", "()J", vec![]).unwrap(), Some(JavaValue::Long(6)));
    assert_eq!(run(&mut jvm, "t/Main", "sub", "(II)I", vec![JavaValue::Int(9), JavaValue::Int(2)]).unwrap(), Some(JavaValue::Int(7)));
}

#[test]
fn too_few_arguments() {
    let mut main = class("t/Main", "java/lang/Object");
    let sub = main.method_ref("t/Main", "sub", "(II)I");
    main.method("sub", "(II)I", STATIC, Some(code(2, 2, vec![
        InstructionInfo::iload(0),
        InstructionInfo::iload(1),
        InstructionInfo::isub,
        InstructionInfo::ireturn,
    ])));
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(3),
        InstructionInfo::invokestatic(sub),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![main]);
    let err = run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap_err();
    match err.fault() {
        Some(Fault::ArgumentCount { expected: 2, available: 1, passed, .. }) => assert_eq!(passed, "int 3"),
        _ => panic!("expected an argument count fault, got {}", err),
    }
}

#[test]
fn mistyped_argument_stays_on_the_stack() {
    let mut main = class("t/Main", "java/lang/Object");
    let sub = main.method_ref("t/Main", "sub", "(II)I");
    main.method("sub", "(II)I", STATIC, Some(code(2, 2, vec![
        InstructionInfo::iload(0),
        InstructionInfo::iload(1),
        InstructionInfo::isub,
        InstructionInfo::ireturn,
    ])));
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(3),
        InstructionInfo::fconst(1.0),
        InstructionInfo::invokestatic(sub),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![main]);
    let err = run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::TypeMismatch { expected: "int", found: JavaValue::Float(1.0) }));
    let snapshot = err.snapshot().unwrap();
    assert_eq!(snapshot.method_name, "test");
    assert_eq!(snapshot.operand_stack, vec![JavaValue::Int(3), JavaValue::Float(1.0)]);
}

#[test]
fn static_initializers_run_once_parent_first() {
    let mut log = class("t/Log", "java/lang/Object");
    log.field("value", "I", STATIC);
    let mut parent = class("t/Parent", "java/lang/Object");
    let parent_log = parent.field_ref("t/Log", "value", "I");
    parent.field("p", "I", STATIC);
    parent.method("<clinit>", "()V", STATIC, Some(code(2, 0, vec![
        InstructionInfo::getstatic(parent_log),
        InstructionInfo::bipush(10),
        InstructionInfo::imul,
        InstructionInfo::iconst(1),
        InstructionInfo::iadd,
        InstructionInfo::putstatic(parent_log),
        InstructionInfo::return_,
    ])));
    let mut child = class("t/Child", "t/Parent");
    let child_log = child.field_ref("t/Log", "value", "I");
    child.field("c", "I", STATIC);
    child.method("<clinit>", "()V", STATIC, Some(code(2, 0, vec![
        InstructionInfo::getstatic(child_log),
        InstructionInfo::bipush(10),
        InstructionInfo::imul,
        InstructionInfo::iconst(2),
        InstructionInfo::iadd,
        InstructionInfo::putstatic(child_log),
        InstructionInfo::return_,
    ])));
    let mut main = class("t/Main", "java/lang/Object");
    let child_c = main.field_ref("t/Child", "c", "I");
    let main_log = main.field_ref("t/Log", "value", "I");
    main.method("test", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::getstatic(child_c),
        InstructionInfo::pop,
        InstructionInfo::getstatic(child_c),
        InstructionInfo::pop,
        InstructionInfo::getstatic(main_log),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![log, parent, child, main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(12)));
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(12)));
}

#[test]
fn constant_values_are_materialized() {
    let mut consts = class("t/Consts", "java/lang/Object");
    let answer = consts.integer(42);
    let big = consts.long(1 << 40);
    consts.constant_field("ANSWER", "I", STATIC, answer);
    consts.constant_field("BIG", "J", STATIC, big);
    consts.constant_field("SMALL", "B", STATIC, answer);
    let mut main = class("t/Main", "java/lang/Object");
    let answer_ref = main.field_ref("t/Consts", "ANSWER", "I");
    let big_ref = main.field_ref("t/Consts", "BIG", "J");
    main.method("answer", "()I", STATIC, Some(code(1, 0, vec![InstructionInfo::getstatic(answer_ref), InstructionInfo::ireturn])));
    main.method("big", "()J", STATIC, Some(code(2, 0, vec![InstructionInfo::getstatic(big_ref), InstructionInfo::lreturn])));
    let mut jvm = vm(vec![consts, main]);
    assert_eq!(run(&mut jvm, "t/Main", "answer", "()I", vec![]).unwrap(), Some(JavaValue::Int(42)));
    assert_eq!(run(&mut jvm, "t/Main", "big", "()J", vec![]).unwrap(), Some(JavaValue::Long(1 << 40)));
    assert_eq!(static_value(&mut jvm, "t/Consts", "SMALL"), JavaValue::Byte(42));
}

fn animals() -> Vec<ClassfileBuilder> {
    let mut animal = class("t/Animal", "java/lang/Object");
    animal.method("sound", "()I", ACC_PUBLIC, Some(code(1, 1, vec![InstructionInfo::iconst(1), InstructionInfo::ireturn])));
    animal.method("legs", "()I", ACC_PUBLIC | ACC_FINAL, Some(code(1, 1, vec![InstructionInfo::iconst(4), InstructionInfo::ireturn])));
    let mut dog = class("t/Dog", "t/Animal");
    dog.method("sound", "()I", ACC_PUBLIC, Some(code(1, 1, vec![InstructionInfo::iconst(2), InstructionInfo::ireturn])));
    let puppy = class("t/Puppy", "t/Dog");
    let cat = class("t/Cat", "t/Animal");
    vec![animal, dog, puppy, cat]
}

#[test]
fn virtual_dispatch_uses_runtime_class() {
    let mut main = class("t/Main", "java/lang/Object");
    let puppy = main.class_ref("t/Puppy");
    let puppy_init = main.method_ref("t/Puppy", "<init>", "()V");
    let animal_sound = main.method_ref("t/Animal", "sound", "()I");
    let super_sound = main.method_ref("t/Animal", "sound", "()I");
    let animal_legs = main.method_ref("t/Animal", "legs", "()I");
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::new(puppy),
        InstructionInfo::dup,
        InstructionInfo::invokespecial(puppy_init),
        InstructionInfo::invokevirtual(animal_sound),
        InstructionInfo::ireturn,
    ])));
    main.method("testFinal", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::new(puppy),
        InstructionInfo::invokevirtual(animal_legs),
        InstructionInfo::ireturn,
    ])));
    main.method("testSpecial", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::new(puppy),
        InstructionInfo::invokespecial(super_sound),
        InstructionInfo::ireturn,
    ])));
    let mut builders = animals();
    builders.push(main);
    let mut jvm = vm(builders);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(2)));
    assert_eq!(run(&mut jvm, "t/Main", "testSpecial", "()I", vec![]).unwrap(), Some(JavaValue::Int(1)));
    assert_eq!(run(&mut jvm, "t/Main", "testFinal", "()I", vec![]).unwrap(), Some(JavaValue::Int(4)));
}

#[test]
fn null_receiver() {
    let mut main = class("t/Main", "java/lang/Object");
    let animal_sound = main.method_ref("t/Animal", "sound", "()I");
    main.method("test", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::aconst_null,
        InstructionInfo::invokevirtual(animal_sound),
        InstructionInfo::ireturn,
    ])));
    let mut builders = animals();
    builders.push(main);
    let mut jvm = vm(builders);
    let err = run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::NullPointer("method invocation")));
}

#[test]
fn interface_calls() {
    let mut shape = ClassfileBuilder::new("t/Shape");
    shape.extends("java/lang/Object").access_flags(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT);
    shape.method("area", "()I", ACC_PUBLIC | ACC_ABSTRACT, None);
    shape.method("sides", "()I", ACC_PUBLIC, Some(code(1, 1, vec![InstructionInfo::iconst(4), InstructionInfo::ireturn])));
    let mut square = class("t/Square", "java/lang/Object");
    square.implements("t/Shape");
    square.method("area", "()I", ACC_PUBLIC, Some(code(1, 1, vec![InstructionInfo::bipush(16), InstructionInfo::ireturn])));
    let mut main = class("t/Main", "java/lang/Object");
    let square_class = main.class_ref("t/Square");
    let area = main.interface_method_ref("t/Shape", "area", "()I");
    let sides = main.interface_method_ref("t/Shape", "sides", "()I");
    main.method("area", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::new(square_class),
        InstructionInfo::invokeinterface(InvokeInterface { index: area, count: 1 }),
        InstructionInfo::ireturn,
    ])));
    main.method("sides", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::new(square_class),
        InstructionInfo::invokeinterface(InvokeInterface { index: sides, count: 1 }),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![shape, square, main]);
    assert_eq!(run(&mut jvm, "t/Main", "area", "()I", vec![]).unwrap(), Some(JavaValue::Int(16)));
    assert_eq!(run(&mut jvm, "t/Main", "sides", "()I", vec![]).unwrap(), Some(JavaValue::Int(4)));
}

#[test]
fn type_checks() {
    let mut main = class("t/Main", "java/lang/Object");
    let puppy = main.class_ref("t/Puppy");
    let animal = main.class_ref("t/Animal");
    let cat = main.class_ref("t/Cat");
    main.method("isAnimal", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::new(puppy),
        InstructionInfo::instanceof(animal),
        InstructionInfo::ireturn,
    ])));
    main.method("isCat", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::new(puppy),
        InstructionInfo::instanceof(cat),
        InstructionInfo::ireturn,
    ])));
    main.method("nullIsAnimal", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::aconst_null,
        InstructionInfo::instanceof(animal),
        InstructionInfo::ireturn,
    ])));
    main.method("castToCat", "()V", STATIC, Some(code(1, 0, vec![
        InstructionInfo::new(puppy),
        InstructionInfo::checkcast(cat),
        InstructionInfo::pop,
        InstructionInfo::return_,
    ])));
    let mut builders = animals();
    builders.push(main);
    let mut jvm = vm(builders);
    assert_eq!(run(&mut jvm, "t/Main", "isAnimal", "()I", vec![]).unwrap(), Some(JavaValue::Int(1)));
    assert_eq!(run(&mut jvm, "t/Main", "isCat", "()I", vec![]).unwrap(), Some(JavaValue::Int(0)));
    assert_eq!(run(&mut jvm, "t/Main", "nullIsAnimal", "()I", vec![]).unwrap(), Some(JavaValue::Int(0)));
    let err = run(&mut jvm, "t/Main", "castToCat", "()V", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::ClassCast { from: ClassName::new("t/Puppy"), to: ClassName::new("t/Cat") }));
}

#[test]
fn instance_fields() {
    let mut point = class("t/Point", "java/lang/Object");
    point.field("x", "I", ACC_PUBLIC).field("y", "J", ACC_PUBLIC).field("flag", "Z", ACC_PUBLIC);
    let mut main = class("t/Main", "java/lang/Object");
    let point_class = main.class_ref("t/Point");
    let x = main.field_ref("t/Point", "x", "I");
    let y = main.field_ref("t/Point", "y", "J");
    let flag = main.field_ref("t/Point", "flag", "Z");
    let seven = main.long(7);
    main.method("test", "()J", STATIC, Some(code(4, 1, vec![
        InstructionInfo::new(point_class),
        InstructionInfo::astore(0),
        InstructionInfo::aload(0),
        InstructionInfo::iconst(5),
        InstructionInfo::putfield(x),
        InstructionInfo::aload(0),
        InstructionInfo::ldc2_w(seven),
        InstructionInfo::putfield(y),
        InstructionInfo::aload(0),
        InstructionInfo::getfield(x),
        InstructionInfo::i2l,
        InstructionInfo::aload(0),
        InstructionInfo::getfield(y),
        InstructionInfo::ladd,
        InstructionInfo::lreturn,
    ])));
    main.method("flag", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::new(point_class),
        InstructionInfo::getfield(flag),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![point, main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()J", vec![]).unwrap(), Some(JavaValue::Long(12)));
    assert_eq!(run(&mut jvm, "t/Main", "flag", "()I", vec![]).unwrap(), Some(JavaValue::Int(0)));
}

#[test]
fn primitive_arrays() {
    let mut main = class("t/Main", "java/lang/Object");
    main.method("test", "()I", STATIC, Some(code(3, 1, vec![
        InstructionInfo::iconst(3),
        InstructionInfo::newarray(Atype::TInt),
        InstructionInfo::astore(0),
        InstructionInfo::aload(0),
        InstructionInfo::iconst(1),
        InstructionInfo::bipush(42),
        InstructionInfo::iastore,
        InstructionInfo::aload(0),
        InstructionInfo::iconst(1),
        InstructionInfo::iaload,
        InstructionInfo::aload(0),
        InstructionInfo::arraylength,
        InstructionInfo::iadd,
        InstructionInfo::ireturn,
    ])));
    main.method("bytes", "()I", STATIC, Some(code(3, 1, vec![
        InstructionInfo::iconst(1),
        InstructionInfo::newarray(Atype::TByte),
        InstructionInfo::astore(0),
        InstructionInfo::aload(0),
        InstructionInfo::iconst(0),
        InstructionInfo::sipush(0x180),
        InstructionInfo::bastore,
        InstructionInfo::aload(0),
        InstructionInfo::iconst(0),
        InstructionInfo::baload,
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(45)));
    assert_eq!(run(&mut jvm, "t/Main", "bytes", "()I", vec![]).unwrap(), Some(JavaValue::Int(-128)));
}

#[test]
fn array_faults() {
    let mut main = class("t/Main", "java/lang/Object");
    let animal = main.class_ref("t/Animal");
    main.method("negative", "()V", STATIC, Some(code(1, 0, vec![
        InstructionInfo::iconst(-1),
        InstructionInfo::anewarray(animal),
        InstructionInfo::pop,
        InstructionInfo::return_,
    ])));
    main.method("outOfBounds", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(2),
        InstructionInfo::newarray(Atype::TInt),
        InstructionInfo::iconst(2),
        InstructionInfo::iaload,
        InstructionInfo::ireturn,
    ])));
    main.method("nullArray", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::aconst_null,
        InstructionInfo::arraylength,
        InstructionInfo::ireturn,
    ])));
    let mut builders = animals();
    builders.push(main);
    let mut jvm = vm(builders);
    let err = run(&mut jvm, "t/Main", "negative", "()V", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::NegativeArraySize(-1)));
    let err = run(&mut jvm, "t/Main", "outOfBounds", "()I", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::ArrayIndexOutOfBounds { index: 2, length: 2 }));
    let err = run(&mut jvm, "t/Main", "nullArray", "()I", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::NullPointer("arraylength")));
}

#[test]
fn arrays_are_objects() {
    let mut main = class("t/Main", "java/lang/Object");
    let animal = main.class_ref("t/Animal");
    let object = main.class_ref("java/lang/Object");
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(1),
        InstructionInfo::anewarray(animal),
        InstructionInfo::dup,
        InstructionInfo::instanceof(object),
        InstructionInfo::swap,
        InstructionInfo::instanceof(animal),
        InstructionInfo::iadd,
        InstructionInfo::ireturn,
    ])));
    let mut builders = animals();
    builders.push(main);
    let mut jvm = vm(builders);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap(), Some(JavaValue::Int(1)));
}

#[test]
fn native_methods_return_zero() {
    let mut main = class("t/Main", "java/lang/Object");
    let now = main.method_ref("t/Main", "now", "(I)J");
    let five = main.long(5);
    main.method("now", "(I)J", STATIC | ACC_NATIVE, None);
    main.method("test", "()J", STATIC, Some(code(4, 0, vec![
        InstructionInfo::iconst(9),
        InstructionInfo::invokestatic(now),
        InstructionInfo::ldc2_w(five),
        InstructionInfo::ladd,
        InstructionInfo::lreturn,
    ])));
    let mut jvm = vm(vec![main]);
    assert_eq!(run(&mut jvm, "t/Main", "test", "()J", vec![]).unwrap(), Some(JavaValue::Long(5)));
}

#[test]
fn unsupported_instructions_fault() {
    let mut main = class("t/Main", "java/lang/Object");
    main.method("throws", "()V", STATIC, Some(code(1, 0, vec![InstructionInfo::aconst_null, InstructionInfo::athrow])));
    main.method("subroutine", "()V", STATIC, Some(code(1, 0, vec![InstructionInfo::jsr(1), InstructionInfo::return_])));
    let mut jvm = vm(vec![main]);
    let err = run(&mut jvm, "t/Main", "throws", "()V", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::Unsupported("athrow")));
    let err = run(&mut jvm, "t/Main", "subroutine", "()V", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::Unsupported("jsr")));
}

fn reference(res: Option<JavaValue>) -> ObjectAddress {
    match res {
        Some(JavaValue::Object(Some(address))) => address,
        other => panic!("expected a non null reference, got {:?}", other),
    }
}

#[test]
fn main_with_a_string_literal() {
    let mut sample = class("t/Sample", "java/lang/Object");
    let hello = sample.string("Hello");
    sample.method("main", "([Ljava/lang/String;)V", STATIC, Some(code(1, 2, vec![
        InstructionInfo::ldc(hello),
        InstructionInfo::astore(1),
        InstructionInfo::return_,
    ])));
    let mut jvm = vm(vec![sample]);
    jvm.execute(&ClassName::new("t/Sample")).unwrap();
}

#[test]
fn string_literals_are_interned() {
    let mut first = class("t/First", "java/lang/Object");
    let hello = first.string("Hello");
    first.method("hello", "()Ljava/lang/Object;", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(hello), InstructionInfo::areturn])));
    let mut second = class("t/Second", "java/lang/Object");
    let hello = second.string("Hello");
    let other = second.string("h\u{e9}llo");
    second.method("hello", "()Ljava/lang/Object;", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(hello), InstructionInfo::areturn])));
    second.method("other", "()Ljava/lang/Object;", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(other), InstructionInfo::areturn])));
    let mut jvm = vm(vec![first, second]);
    let first_hello = reference(run(&mut jvm, "t/First", "hello", "()Ljava/lang/Object;", vec![]).unwrap());
    let second_hello = reference(run(&mut jvm, "t/Second", "hello", "()Ljava/lang/Object;", vec![]).unwrap());
    let other = reference(run(&mut jvm, "t/Second", "other", "()Ljava/lang/Object;", vec![]).unwrap());
    assert_eq!(first_hello, second_hello);
    assert_ne!(first_hello, other);
    assert_eq!(string_contents(&jvm, first_hello).as_deref(), Some("Hello"));
    assert_eq!(string_contents(&jvm, other).as_deref(), Some("h\u{e9}llo"));
}

#[test]
fn string_literals_use_the_string_class_when_present() {
    let mut string = class("java/lang/String", "java/lang/Object");
    string.field("value", "[C", ACC_PUBLIC).field("hash", "I", ACC_PUBLIC);
    let mut main = class("t/Main", "java/lang/Object");
    let hello = main.string("Hello");
    let string_class = main.class_ref("java/lang/String");
    main.method("isString", "()I", STATIC, Some(code(1, 0, vec![
        InstructionInfo::ldc(hello),
        InstructionInfo::instanceof(string_class),
        InstructionInfo::ireturn,
    ])));
    main.method("hello", "()Ljava/lang/Object;", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(hello), InstructionInfo::areturn])));
    let mut jvm = vm(vec![string, main]);
    assert_eq!(run(&mut jvm, "t/Main", "isString", "()I", vec![]).unwrap(), Some(JavaValue::Int(1)));
    let hello = reference(run(&mut jvm, "t/Main", "hello", "()Ljava/lang/Object;", vec![]).unwrap());
    assert!(!jvm.memory.is_array(hello).unwrap());
    assert_eq!(string_contents(&jvm, hello).as_deref(), Some("Hello"));
}

#[test]
fn class_literals_have_one_object_per_class() {
    let mut main = class("t/Main", "java/lang/Object");
    let animal = main.class_ref("t/Animal");
    let dog = main.class_ref("t/Dog");
    main.method("animal", "()Ljava/lang/Object;", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(animal), InstructionInfo::areturn])));
    main.method("dog", "()Ljava/lang/Object;", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(dog), InstructionInfo::areturn])));
    main.method("same", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::ldc(animal),
        InstructionInfo::ldc(animal),
        InstructionInfo::if_acmpeq(5),
        InstructionInfo::iconst(0),
        InstructionInfo::ireturn,
        InstructionInfo::iconst(1),
        InstructionInfo::ireturn,
    ])));
    let mut builders = animals();
    builders.push(main);
    let mut jvm = vm(builders);
    assert_eq!(run(&mut jvm, "t/Main", "same", "()I", vec![]).unwrap(), Some(JavaValue::Int(1)));
    let animal = reference(run(&mut jvm, "t/Main", "animal", "()Ljava/lang/Object;", vec![]).unwrap());
    let dog = reference(run(&mut jvm, "t/Main", "dog", "()Ljava/lang/Object;", vec![]).unwrap());
    assert_ne!(animal, dog);
    let object = jvm.classes.load(&ClassName::object()).unwrap();
    assert_eq!(jvm.memory.class_id(animal).unwrap(), object.id);
}

#[test]
fn class_literal_of_a_missing_class() {
    let mut main = class("t/Main", "java/lang/Object");
    let missing = main.class_ref("t/Missing");
    main.method("test", "()V", STATIC, Some(code(1, 0, vec![InstructionInfo::ldc(missing), InstructionInfo::pop, InstructionInfo::return_])));
    let mut jvm = vm(vec![main]);
    match run(&mut jvm, "t/Main", "test", "()V", vec![]) {
        Err(ExecutionError::Frame { error, .. }) => assert!(matches!(*error, InstructionError::Loading(ClassLoadingError::ClassNotFound(_)))),
        other => panic!("expected a missing class, got {:?}", other),
    }
}

#[test]
fn faults_carry_a_frame_snapshot() {
    let mut main = class("t/Main", "java/lang/Object");
    let divide = main.method_ref("t/Main", "divide", "(II)I");
    main.method("divide", "(II)I", STATIC, Some(code(2, 3, vec![
        InstructionInfo::iload(0),
        InstructionInfo::iload(1),
        InstructionInfo::idiv,
        InstructionInfo::ireturn,
    ])));
    main.method("test", "()I", STATIC, Some(code(2, 0, vec![
        InstructionInfo::iconst(1),
        InstructionInfo::iconst(0),
        InstructionInfo::invokestatic(divide),
        InstructionInfo::ireturn,
    ])));
    let mut jvm = vm(vec![main]);
    let err = run(&mut jvm, "t/Main", "test", "()I", vec![]).unwrap_err();
    assert_eq!(err.fault(), Some(&Fault::DivisionByZero));
    let snapshot = err.snapshot().unwrap();
    assert_eq!(snapshot.method_name, "divide");
    assert_eq!(snapshot.pc, 2);
    let message = err.to_string();
    assert!(message.contains("division by zero"));
    assert!(message.contains("method: divide(II)I"));
    assert!(message.contains("  ->    2: idiv"));
    assert!(message.contains("locals: 0:int 1 1:int 0 2:null!"));
    assert!(message.contains("t/Main.divide(II)I\n  t/Main.test()I"));
}

#[test]
fn execute_runs_static_initializer_before_main() {
    let mut main = class("t/Main", "java/lang/Object");
    let seen = main.field_ref("t/Main", "seen", "I");
    let result = main.field_ref("t/Main", "result", "I");
    main.field("seen", "I", STATIC).field("result", "I", STATIC);
    main.method("<clinit>", "()V", STATIC, Some(code(1, 0, vec![
        InstructionInfo::bipush(7),
        InstructionInfo::putstatic(seen),
        InstructionInfo::return_,
    ])));
    main.method("main", "([Ljava/lang/String;)V", STATIC, Some(code(2, 1, vec![
        InstructionInfo::aload(0),
        InstructionInfo::arraylength,
        InstructionInfo::getstatic(seen),
        InstructionInfo::iadd,
        InstructionInfo::putstatic(result),
        InstructionInfo::return_,
    ])));
    let mut jvm = vm(vec![main]);
    jvm.execute(&ClassName::new("t/Main")).unwrap();
    assert_eq!(static_value(&mut jvm, "t/Main", "result"), JavaValue::Int(7));
}

#[test]
fn inherited_main_initializes_the_entry_class() {
    let mut base = class("t/Base", "java/lang/Object");
    let base_seen = base.field_ref("t/Base", "seen", "I");
    base.field("seen", "I", STATIC);
    base.method("<clinit>", "()V", STATIC, Some(code(1, 0, vec![
        InstructionInfo::iconst(2),
        InstructionInfo::putstatic(base_seen),
        InstructionInfo::return_,
    ])));
    base.method("main", "([Ljava/lang/String;)V", STATIC, Some(code(0, 1, vec![InstructionInfo::return_])));
    let mut entry = class("t/Entry", "t/Base");
    let entry_seen = entry.field_ref("t/Entry", "seen", "I");
    entry.field("seen", "I", STATIC);
    entry.method("<clinit>", "()V", STATIC, Some(code(1, 0, vec![
        InstructionInfo::iconst(1),
        InstructionInfo::putstatic(entry_seen),
        InstructionInfo::return_,
    ])));
    let mut jvm = vm(vec![base, entry]);
    jvm.execute(&ClassName::new("t/Entry")).unwrap();
    assert_eq!(static_value(&mut jvm, "t/Entry", "seen"), JavaValue::Int(1));
    assert_eq!(static_value(&mut jvm, "t/Base", "seen"), JavaValue::Int(2));
}

#[test]
fn entry_point_must_be_static() {
    let mut main = class("t/Main", "java/lang/Object");
    main.method("main", "([Ljava/lang/String;)V", ACC_PUBLIC, Some(code(0, 2, vec![InstructionInfo::return_])));
    let mut jvm = vm(vec![main]);
    match jvm.execute(&ClassName::new("t/Main")) {
        Err(ExecutionError::EntryNotStatic(_)) => {}
        other => panic!("expected a non static entry point error, got {:?}", other),
    }
}

#[test]
fn missing_entry_point() {
    let main = class("t/Main", "java/lang/Object");
    let mut jvm = vm(vec![main]);
    match jvm.execute(&ClassName::new("t/Main")) {
        Err(ExecutionError::Link(LinkError::MethodNotFound { .. })) => {}
        other => panic!("expected a missing method, got {:?}", other),
    }
}
