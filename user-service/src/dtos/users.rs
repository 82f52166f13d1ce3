use serde_json::Value;

/// Body of `POST /api/users`.
///
/// Fields are kept as raw JSON so that a wrong type is reported by validation
/// instead of failing deserialization. Only an object body carries fields;
/// any other body shape yields none.
#[derive(Debug, Default, PartialEq)]
pub struct CreateUserRequest {
    pub name: Option<Value>,
    pub email: Option<Value>,
}

impl From<Value> for CreateUserRequest {
    fn from(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self {
                name: fields.remove("name"),
                email: fields.remove("email"),
            },
            _ => Self::default(),
        }
    }
}
