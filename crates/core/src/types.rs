use std::fmt;

/// A Nova type as seen by the semantic analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Void,
    Array { element: Box<Type>, size: usize },
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Stands in for expressions whose type could not be determined
    Error,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Whether a value of type `value` can be stored in a slot of this type.
    /// The only implicit conversion Nova performs is int to float.
    pub fn accepts(&self, value: &Type) -> bool {
        self == value || (*self == Type::Float && *value == Type::Int)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Error => write!(f, "error"),
            Type::Array { element, size } => write!(f, "{element}[{size}]"),
            Type::Function { params, ret } => {
                write!(f, "{ret}(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
        }
    }
}
