// Output checks applied to every generation response before it is used:
// structural validation against the declared schema, then grounding of
// employer, school and date claims against the source profile.

pub mod checker;
pub mod validator;
