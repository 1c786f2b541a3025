#[macro_export]
macro_rules! param_value {
    (, $default:ident) => {
        $default
    };
    ($explicit:expr, $default:ident) => {
        $explicit
    };
}

#[macro_export]
macro_rules! push_param {
    ($params:ident, required, $key:expr, $val:expr) => {
        $params.push(($key, $val.to_string()));
    };
    ($params:ident, optional, $key:expr, $val:expr) => {
        if let Some(ref v) = $val {
            $params.push(($key, v.to_string()));
        }
    };
}

/// Builds the query pairs of a listing request.
/// A bare name uses the variable of the same name as value, `name => expr` uses the expression.
/// ```
/// use keeper_util::build_params;
///
/// let limit = 10;
/// let after: Option<&str> = None;
/// let params = build_params! {
///     required limit,
///     optional after,
///     required raw_json => 1,
/// };
/// assert_eq!(params, vec![("limit".to_string(), "10".to_string()), ("raw_json".to_string(), "1".to_string())]);
/// ```
#[macro_export]
macro_rules! build_params {
    (
        $(
            $kind:ident $name:ident $( => $val:expr )?
        ),+ $(,)?
    ) => {
        {
            let mut params: Vec<(String, String)> = Vec::new();
            $(
                $crate::push_param!(
                    params,
                    $kind,
                    stringify!($name).to_string(),
                    $crate::param_value!($( $val )?, $name)
                );
            )+
            params
        }
    };
}
