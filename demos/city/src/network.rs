//! Embedded Manila road network.
//!
//! Ten districts joined by two-way roads.  Tondo is heavily congested and
//! Pandacan is closed, so searches route around both.

use std::io::Cursor;

use rr_graph::{Edge, GraphResult, Node, load_graph_reader};

pub const NODES_CSV: &str = "\
id,name,lat,lng,congestion,blocked\n\
1,Quiapo,14.5990,120.9840,20,false\n\
2,Sampaloc,14.6040,120.9920,35,false\n\
3,Binondo,14.6000,120.9740,55,false\n\
4,Ermita,14.5830,120.9840,15,false\n\
5,Malate,14.5720,120.9900,30,false\n\
6,Paco,14.5800,121.0000,10,false\n\
7,Santa Mesa,14.6000,121.0120,25,false\n\
8,Tondo,14.6150,120.9680,92,false\n\
9,Santa Cruz,14.6160,120.9840,40,false\n\
10,Pandacan,14.5900,121.0080,0,true\n\
";

pub const EDGES_CSV: &str = "\
from,to,distance_m,travel_time_s,congestion_factor\n\
1,2,1310,154,1.2\n\
2,1,1310,154,1.2\n\
1,3,1390,164,1.3\n\
3,1,1390,164,1.3\n\
1,4,2220,261,1.4\n\
4,1,2220,261,1.4\n\
1,9,2360,278,1.4\n\
9,1,2360,278,1.4\n\
2,7,2830,333,1.4\n\
7,2,2830,333,1.4\n\
2,9,2000,235,1.3\n\
9,2,2000,235,1.3\n\
3,8,2240,264,1.4\n\
8,3,2240,264,1.4\n\
3,4,2740,322,1.2\n\
4,3,2740,322,1.2\n\
4,5,1740,205,1.0\n\
5,4,1740,205,1.0\n\
4,6,2260,266,1.4\n\
6,4,2260,266,1.4\n\
5,6,1780,209,1.0\n\
6,5,1780,209,1.0\n\
6,10,1780,209,1.0\n\
10,6,1780,209,1.0\n\
10,7,1490,175,1.0\n\
7,10,1490,175,1.0\n\
6,7,3240,381,1.2\n\
7,6,3240,381,1.2\n\
8,9,2220,261,1.2\n\
9,8,2220,261,1.2\n\
2,6,3510,413,1.2\n\
6,2,3510,413,1.2\n\
";

pub fn load_network() -> GraphResult<(Vec<Node>, Vec<Edge>)> {
    load_graph_reader(Cursor::new(NODES_CSV), Cursor::new(EDGES_CSV))
}
