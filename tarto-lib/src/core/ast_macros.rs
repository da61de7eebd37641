/// generates a type for an enum node, which always only contains variants with one unnamed field,
/// which are further nodes. It implements From<T> for each child type, and it implements
/// Display, by rendering the child
macro_rules! mk_enum_node{
    ($(#[$meta:meta])* $name:ident $(, $child_ty:tt)+) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
        pub enum $name {
            $($child_ty($child_ty),)*
        }

    $(
        impl From<$child_ty> for $name {
            fn from(child: $child_ty) -> Self {
                Self::$child_ty(child)
            }
        }
    )*

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$child_ty(t) => t.fmt(f),)*
                }
            }
        }
    };
}
pub(crate) use mk_enum_node;

/// implements From<T> for Node for each listed leaf type, by going through
/// the given enum node
macro_rules! node_from_leaf {
    ($enum_node:ident: $($leaf:ty),+) => {
        $(
            impl From<$leaf> for Node {
                fn from(leaf: $leaf) -> Self {
                    Node::$enum_node($enum_node::from(leaf))
                }
            }
        )*
    };
}
pub(crate) use node_from_leaf;
