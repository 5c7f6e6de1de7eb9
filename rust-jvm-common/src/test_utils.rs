use std::collections::HashMap;

use crate::CPIndex;
use crate::classfile::{Classfile, Code, ConstantKind, ConstantPool, FieldInfo, InstructionInfo, MemberRef, MethodInfo, ACC_PUBLIC, ACC_SUPER};

/// Builds class descriptions in memory, interning constant pool entries as they are requested.
pub struct ClassfileBuilder {
    constant_pool: Vec<ConstantKind>,
    interned: HashMap<String, CPIndex>,
    access_flags: u16,
    this_class: CPIndex,
    super_class: Option<CPIndex>,
    interfaces: Vec<CPIndex>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
}

impl ClassfileBuilder {
    /// A public class with no superclass.
    pub fn new(name: &str) -> Self {
        let mut res = Self {
            constant_pool: vec![ConstantKind::InvalidConstant],
            interned: HashMap::new(),
            access_flags: ACC_PUBLIC | ACC_SUPER,
            this_class: 0,
            super_class: None,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
        };
        res.this_class = res.class_ref(name);
        res
    }

    fn push(&mut self, key: String, kind: ConstantKind) -> CPIndex {
        if let Some(index) = self.interned.get(&key) {
            return *index;
        }
        let wide = matches!(kind, ConstantKind::Long(_) | ConstantKind::Double(_));
        let index = self.constant_pool.len() as CPIndex;
        self.constant_pool.push(kind);
        if wide {
            self.constant_pool.push(ConstantKind::InvalidConstant);
        }
        self.interned.insert(key, index);
        index
    }

    pub fn extends(&mut self, super_name: &str) -> &mut Self {
        self.super_class = Some(self.class_ref(super_name));
        self
    }

    pub fn implements(&mut self, interface: &str) -> &mut Self {
        let index = self.class_ref(interface);
        self.interfaces.push(index);
        self
    }

    pub fn access_flags(&mut self, access_flags: u16) -> &mut Self {
        self.access_flags = access_flags;
        self
    }

    pub fn utf8(&mut self, str_: &str) -> CPIndex {
        self.push(format!("utf8 {}", str_), ConstantKind::Utf8(str_.to_string()))
    }

    pub fn class_ref(&mut self, name: &str) -> CPIndex {
        let name_index = self.utf8(name);
        self.push(format!("class {}", name), ConstantKind::Class { name_index })
    }

    pub fn name_and_type(&mut self, name: &str, desc: &str) -> CPIndex {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(desc);
        self.push(format!("nat {} {}", name, desc), ConstantKind::NameAndType { name_index, descriptor_index })
    }

    fn member(&mut self, class: &str, name: &str, desc: &str) -> MemberRef {
        MemberRef { class_index: self.class_ref(class), name_and_type_index: self.name_and_type(name, desc) }
    }

    pub fn field_ref(&mut self, class: &str, name: &str, desc: &str) -> CPIndex {
        let member = self.member(class, name, desc);
        self.push(format!("field {}.{}{}", class, name, desc), ConstantKind::Fieldref(member))
    }

    pub fn method_ref(&mut self, class: &str, name: &str, desc: &str) -> CPIndex {
        let member = self.member(class, name, desc);
        self.push(format!("method {}.{}{}", class, name, desc), ConstantKind::Methodref(member))
    }

    pub fn interface_method_ref(&mut self, class: &str, name: &str, desc: &str) -> CPIndex {
        let member = self.member(class, name, desc);
        self.push(format!("imethod {}.{}{}", class, name, desc), ConstantKind::InterfaceMethodref(member))
    }

    pub fn integer(&mut self, value: i32) -> CPIndex {
        self.push(format!("int {}", value), ConstantKind::Integer(value))
    }

    pub fn float(&mut self, value: f32) -> CPIndex {
        self.push(format!("float {}", value.to_bits()), ConstantKind::Float(value))
    }

    pub fn long(&mut self, value: i64) -> CPIndex {
        self.push(format!("long {}", value), ConstantKind::Long(value))
    }

    pub fn double(&mut self, value: f64) -> CPIndex {
        self.push(format!("double {}", value.to_bits()), ConstantKind::Double(value))
    }

    pub fn string(&mut self, value: &str) -> CPIndex {
        let string_index = self.utf8(value);
        self.push(format!("string {}", value), ConstantKind::String { string_index })
    }

    pub fn field(&mut self, name: &str, desc: &str, access_flags: u16) -> &mut Self {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(desc);
        self.fields.push(FieldInfo { access_flags, name_index, descriptor_index, constant_value: None });
        self
    }

    pub fn constant_field(&mut self, name: &str, desc: &str, access_flags: u16, constant_value: CPIndex) -> &mut Self {
        self.field(name, desc, access_flags);
        if let Some(field) = self.fields.last_mut() {
            field.constant_value = Some(constant_value);
        }
        self
    }

    pub fn method(&mut self, name: &str, desc: &str, access_flags: u16, code: Option<Code>) -> &mut Self {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(desc);
        self.methods.push(MethodInfo { access_flags, name_index, descriptor_index, code });
        self
    }

    pub fn build(&self) -> Classfile {
        Classfile {
            minor_version: 0,
            major_version: 52,
            constant_pool: ConstantPool::new(self.constant_pool.clone()),
            access_flags: self.access_flags,
            this_class: self.this_class,
            super_class: self.super_class,
            interfaces: self.interfaces.clone(),
            fields: self.fields.clone(),
            methods: self.methods.clone(),
        }
    }
}

pub fn code(max_stack: u16, max_locals: u16, instructions: Vec<InstructionInfo>) -> Code {
    Code { max_stack, max_locals, instructions, exception_table: vec![] }
}
