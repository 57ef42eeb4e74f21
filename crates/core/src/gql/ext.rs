use async_graphql::Value as GqlValue;

pub(crate) trait GqlValueUtils {
	fn as_string(&self) -> Option<String>;
}

impl GqlValueUtils for GqlValue {
	fn as_string(&self) -> Option<String> {
		if let GqlValue::String(s) = self {
			Some(s.to_owned())
		} else {
			None
		}
	}
}
