//! Legacy OpenGL entry points
//!
//! Only the fixed-function subset the viewer draws with. Pointers are
//! resolved per context through the window's proc-address loader.

#![allow(non_snake_case, dead_code)]

use std::ffi::c_void;

use crate::backend::BackendError;

pub type GLenum = u32;
pub type GLbitfield = u32;
pub type GLint = i32;
pub type GLuint = u32;
pub type GLsizei = i32;
pub type GLfloat = f32;
pub type GLdouble = f64;

pub const COLOR_BUFFER_BIT: GLbitfield = 0x0000_4000;
pub const DEPTH_BUFFER_BIT: GLbitfield = 0x0000_0100;

pub const POINTS: GLenum = 0x0000;
pub const LINES: GLenum = 0x0001;
pub const LINE_STRIP: GLenum = 0x0003;
pub const QUADS: GLenum = 0x0007;

pub const DEPTH_TEST: GLenum = 0x0B71;
pub const LIGHTING: GLenum = 0x0B50;
pub const TEXTURE_2D: GLenum = 0x0DE1;
pub const CULL_FACE: GLenum = 0x0B44;

pub const LEQUAL: GLenum = 0x0203;
pub const ALWAYS: GLenum = 0x0207;

pub const MODELVIEW: GLenum = 0x1700;
pub const PROJECTION: GLenum = 0x1701;
pub const MODELVIEW_MATRIX: GLenum = 0x0BA6;

pub const RGB: GLenum = 0x1907;
pub const RGBA: GLenum = 0x1908;
pub const LUMINANCE: GLenum = 0x1909;
pub const BGR: GLenum = 0x80E0;
pub const BGRA: GLenum = 0x80E1;

pub const UNSIGNED_BYTE: GLenum = 0x1401;
pub const UNSIGNED_SHORT: GLenum = 0x1403;
pub const FLOAT: GLenum = 0x1406;

pub const TEXTURE_MAG_FILTER: GLenum = 0x2800;
pub const TEXTURE_MIN_FILTER: GLenum = 0x2801;
pub const TEXTURE_WRAP_S: GLenum = 0x2802;
pub const TEXTURE_WRAP_T: GLenum = 0x2803;
pub const LINEAR: GLint = 0x2601;
pub const CLAMP: GLint = 0x2900;
pub const UNPACK_ROW_LENGTH: GLenum = 0x0CF2;
pub const UNPACK_ALIGNMENT: GLenum = 0x0CF5;

macro_rules! gl_functions {
    ($($field:ident = $symbol:literal: fn($($arg:ty),*) $(-> $ret:ty)?;)+) => {
        /// Resolved function table for one context
        pub struct Gl {
            $(pub $field: unsafe extern "system" fn($($arg),*) $(-> $ret)?,)+
        }

        impl Gl {
            /// Resolve every entry point through `loader`
            pub fn load(mut loader: impl FnMut(&str) -> *const c_void) -> Result<Self, BackendError> {
                Ok(Self {
                    $($field: {
                        let ptr = loader($symbol);
                        if ptr.is_null() {
                            return Err(BackendError::MissingGlFunction($symbol));
                        }
                        // SAFETY: non-null pointer returned by the context's loader for this symbol
                        unsafe {
                            std::mem::transmute::<*const c_void, unsafe extern "system" fn($($arg),*) $(-> $ret)?>(ptr)
                        }
                    },)+
                })
            }
        }
    };
}

gl_functions! {
    Viewport = "glViewport": fn(GLint, GLint, GLsizei, GLsizei);
    ClearColor = "glClearColor": fn(GLfloat, GLfloat, GLfloat, GLfloat);
    Clear = "glClear": fn(GLbitfield);
    Enable = "glEnable": fn(GLenum);
    Disable = "glDisable": fn(GLenum);
    DepthFunc = "glDepthFunc": fn(GLenum);
    LineWidth = "glLineWidth": fn(GLfloat);
    PointSize = "glPointSize": fn(GLfloat);
    MatrixMode = "glMatrixMode": fn(GLenum);
    LoadIdentity = "glLoadIdentity": fn();
    LoadMatrixd = "glLoadMatrixd": fn(*const GLdouble);
    GetDoublev = "glGetDoublev": fn(GLenum, *mut GLdouble);
    PushMatrix = "glPushMatrix": fn();
    PopMatrix = "glPopMatrix": fn();
    Begin = "glBegin": fn(GLenum);
    End = "glEnd": fn();
    Color3f = "glColor3f": fn(GLfloat, GLfloat, GLfloat);
    Normal3f = "glNormal3f": fn(GLfloat, GLfloat, GLfloat);
    Vertex2f = "glVertex2f": fn(GLfloat, GLfloat);
    Vertex3f = "glVertex3f": fn(GLfloat, GLfloat, GLfloat);
    TexCoord2f = "glTexCoord2f": fn(GLfloat, GLfloat);
    GenTextures = "glGenTextures": fn(GLsizei, *mut GLuint);
    DeleteTextures = "glDeleteTextures": fn(GLsizei, *const GLuint);
    BindTexture = "glBindTexture": fn(GLenum, GLuint);
    TexImage2D = "glTexImage2D": fn(GLenum, GLint, GLint, GLsizei, GLsizei, GLint, GLenum, GLenum, *const c_void);
    TexParameteri = "glTexParameteri": fn(GLenum, GLenum, GLint);
    PixelStorei = "glPixelStorei": fn(GLenum, GLint);
}
