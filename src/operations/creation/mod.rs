mod make_box;
mod make_compound;
mod make_face;
mod make_sphere;
mod make_wire;

pub use make_box::MakeBox;
pub use make_compound::{MakeCompSolid, MakeCompound};
pub use make_face::MakeFace;
pub use make_sphere::MakeSphere;
pub use make_wire::MakeWire;
