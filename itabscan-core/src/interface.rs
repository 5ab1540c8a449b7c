/// One (interface, concrete type) pair recovered from an itab record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    /// Interface name without its package path, e.g. `Reader`.
    pub name: String,
    /// Fully qualified name of the implementing type, pointer marker removed.
    pub implemented: String,
    pub pkg_path: String,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// The function type's own name, e.g. `func([]uint8) (int, error)`.
    pub signature: String,
    pub inputs: Vec<Type>,
    pub outputs: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub name: String,
    pub pkg_path: String,
    pub is_pointer: bool,
}

impl Type {
    pub fn qualified_name(&self) -> String {
        if self.pkg_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.pkg_path, self.name)
        }
    }
}
